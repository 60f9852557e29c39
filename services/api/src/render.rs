use crate::infra::parse_timestamp_arg;
use chrono::{DateTime, Utc};
use clap::Args;
use medport::error::AppError;
use medport::insights::HealthDashboard;
use medport::reports::{
    analyze_report, PatientId, RejectedReport, ReportAnalysis, ReportBatch, ReportId,
    ReportImporter, RepositoryError,
};
use medport::{InsightsEngine, InsightsServiceError};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct InsightsReportArgs {
    /// Report export to analyse (CSV with id, report_type, hospital, created_at columns)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Only include reports belonging to this patient
    #[arg(long)]
    pub(crate) patient: Option<String>,
    /// Evaluation instant (RFC 3339 or YYYY-MM-DD, defaults to now)
    #[arg(long, value_parser = parse_timestamp_arg)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Emit the dashboard as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Report export containing the report
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Identifier of the report to analyse
    #[arg(long)]
    pub(crate) report_id: String,
    /// Emit the analysis as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct InsightsReportOutput<'a> {
    #[serde(flatten)]
    dashboard: &'a HealthDashboard,
    rejected: &'a [RejectedReport],
}

pub(crate) fn run_insights_report(args: InsightsReportArgs) -> Result<(), AppError> {
    let InsightsReportArgs {
        csv,
        patient,
        now,
        json,
    } = args;

    let now = now.unwrap_or_else(Utc::now);
    let batch = load_batch(csv, patient.map(PatientId))?;
    let dashboard = InsightsEngine::new(&batch.reports, now).dashboard();

    if json {
        let output = InsightsReportOutput {
            dashboard: &dashboard,
            rejected: &batch.rejected,
        };
        print_json(&output);
    } else {
        render_dashboard(&dashboard, &batch.rejected);
    }

    Ok(())
}

pub(crate) fn run_analysis(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        csv,
        report_id,
        json,
    } = args;

    let batch = load_batch(csv, None)?;
    let report_id = ReportId(report_id);
    let report = batch
        .reports
        .iter()
        .find(|report| report.id == report_id)
        .ok_or(InsightsServiceError::Repository(RepositoryError::NotFound))?;

    let analysis = analyze_report(report);
    if json {
        print_json(&analysis);
    } else {
        render_analysis(&analysis);
    }

    Ok(())
}

fn load_batch(csv: PathBuf, patient: Option<PatientId>) -> Result<ReportBatch, AppError> {
    let mut batch = ReportImporter::from_path(csv)?;
    if let Some(patient) = patient {
        batch.reports.retain(|report| report.patient_id == patient);
    }
    Ok(batch)
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(err) => println!("JSON output unavailable: {}", err),
    }
}

pub(crate) fn render_dashboard(dashboard: &HealthDashboard, rejected: &[RejectedReport]) {
    let summary = &dashboard.summary;
    let metrics = &dashboard.metrics;

    println!(
        "Health insights (evaluated {})",
        dashboard.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!(
        "Health score: {}/100 | {} insight(s): {} warning, {} positive, {} critical",
        metrics.health_score,
        metrics.total_insights,
        metrics.warning_insights,
        metrics.positive_insights,
        metrics.critical_insights
    );

    println!("\nSummary");
    println!(
        "- {} report(s), {} in the last 30 days",
        summary.total_reports, summary.recent_activity
    );
    println!(
        "- {:.1} reports per month on average",
        summary.average_reports_per_month
    );
    match summary.last_report_date {
        Some(date) => println!("- Last report on {}", date.format("%Y-%m-%d")),
        None => println!("- No reports on file"),
    }
    if !summary.most_common_hospital.is_empty() {
        println!("- Most visited provider: {}", summary.most_common_hospital);
    }
    if !summary.report_types.is_empty() {
        println!("\nReport types");
        for (report_type, count) in &summary.report_types {
            println!("- {}: {}", report_type, count);
        }
    }

    if dashboard.insights.is_empty() {
        println!("\nInsights: none");
    } else {
        println!("\nInsights");
        for insight in &dashboard.insights {
            println!(
                "- [{} | {} | p{}] {}: {}",
                insight.insight_type.label(),
                insight.category.label(),
                insight.priority,
                insight.title,
                insight.description
            );
        }
    }

    if !dashboard.score_breakdown.is_empty() {
        println!("\nScore breakdown (base 50)");
        for adjustment in &dashboard.score_breakdown {
            println!("- {:+} {}", adjustment.points, adjustment.notes);
        }
    }

    println!("\nImprovement tips");
    for tip in &dashboard.tips {
        println!(
            "- {} ({}): {}",
            tip.title,
            tip.difficulty.label(),
            tip.actionable
        );
    }

    if !rejected.is_empty() {
        println!("\nRejected records");
        for record in rejected {
            println!(
                "- row {} ({}): {}",
                record.index + 1,
                record.id.as_deref().unwrap_or("no id"),
                record.reason
            );
        }
    }
}

fn render_analysis(analysis: &ReportAnalysis) {
    println!("{}", analysis.headline);

    println!("\nWhat to look for");
    for finding in &analysis.findings {
        println!("- {}", finding);
    }

    println!("\nSuggested next steps");
    for recommendation in &analysis.recommendations {
        println!("- {}", recommendation);
    }

    println!("\n{}", analysis.disclaimer);
}
