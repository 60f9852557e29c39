use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use medport::insights::HealthDashboard;
use medport::reports::{
    deserialize_optional_timestamp, validate_records, RejectedReport, ReportRecord,
    ReportRepository,
};
use medport::{insights_router, InsightsEngine, ReportInsightsService};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Ad-hoc evaluation of a caller-supplied report list; nothing is stored.
#[derive(Debug, Deserialize)]
pub(crate) struct InsightsRequest {
    #[serde(default)]
    pub(crate) reports: Vec<ReportRecord>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct InsightsResponse {
    #[serde(flatten)]
    pub(crate) dashboard: HealthDashboard,
    pub(crate) rejected: Vec<RejectedReport>,
}

pub(crate) fn with_insights_routes<R>(service: Arc<ReportInsightsService<R>>) -> axum::Router
where
    R: ReportRepository + 'static,
{
    insights_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/insights", axum::routing::post(insights_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn insights_endpoint(
    Json(payload): Json<InsightsRequest>,
) -> Json<InsightsResponse> {
    let InsightsRequest { reports, now } = payload;

    let batch = validate_records(reports);
    let now = now.unwrap_or_else(Utc::now);
    let dashboard = InsightsEngine::new(&batch.reports, now).dashboard();

    debug!(
        accepted = batch.reports.len(),
        rejected = batch.rejected.len(),
        health_score = dashboard.metrics.health_score,
        "evaluated ad-hoc report list"
    );

    Json(InsightsResponse {
        dashboard,
        rejected: batch.rejected,
    })
}
