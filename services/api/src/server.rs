use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryReportRepository};
use crate::routes::with_insights_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use medport::config::AppConfig;
use medport::error::AppError;
use medport::reports::ReportImporter;
use medport::telemetry;
use medport::ReportInsightsService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryReportRepository::default());
    let insights_service = Arc::new(ReportInsightsService::new(repository));

    if let Some(seed) = config.reports.seed_csv.as_ref() {
        let batch = ReportImporter::from_path(seed)?;
        let inserted = insights_service.ingest(batch)?;
        info!(path = %seed.display(), inserted, "seeded report store");
    }

    let app = with_insights_routes(insights_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "report insights service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
