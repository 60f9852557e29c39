use crate::render::{run_analysis, run_insights_report, AnalyzeArgs, InsightsReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use medport::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Medical Report Portal",
    about = "Serve and inspect report insights for the medical-report portal",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute insights from a report export without starting the server
    Insights {
        #[command(subcommand)]
        command: InsightsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum InsightsCommand {
    /// Print the health summary, insights, tips and score for a report export
    Report(InsightsReportArgs),
    /// Print the canned analysis for a single report in an export
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Insights {
            command: InsightsCommand::Report(args),
        } => run_insights_report(args),
        Command::Insights {
            command: InsightsCommand::Analyze(args),
        } => run_analysis(args),
    }
}
