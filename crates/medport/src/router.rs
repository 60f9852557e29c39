use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::reports::{
    deserialize_optional_timestamp, PatientId, ReportId, ReportRepository, RepositoryError,
};
use crate::service::{InsightsServiceError, ReportInsightsService};
use crate::session::PortalSession;

/// Router builder exposing the session-scoped dashboard and analysis endpoints.
pub fn insights_router<R>(service: Arc<ReportInsightsService<R>>) -> Router
where
    R: ReportRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/patients/:patient_id/dashboard",
            get(dashboard_handler::<R>),
        )
        .route(
            "/api/v1/reports/:report_id/analysis",
            get(analysis_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardQuery {
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub(crate) now: Option<DateTime<Utc>>,
}

pub(crate) async fn dashboard_handler<R>(
    State(service): State<Arc<ReportInsightsService<R>>>,
    Path(patient_id): Path<String>,
    Query(query): Query<DashboardQuery>,
    headers: HeaderMap,
) -> Response
where
    R: ReportRepository + 'static,
{
    let session = match PortalSession::from_headers(&headers) {
        Ok(session) => session,
        Err(error) => return unauthorized(error),
    };

    let now = query.now.unwrap_or_else(Utc::now);
    match service.dashboard(&session, &PatientId(patient_id), now) {
        Ok(dashboard) => (StatusCode::OK, axum::Json(dashboard)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn analysis_handler<R>(
    State(service): State<Arc<ReportInsightsService<R>>>,
    Path(report_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: ReportRepository + 'static,
{
    let session = match PortalSession::from_headers(&headers) {
        Ok(session) => session,
        Err(error) => return unauthorized(error),
    };

    match service.analysis(&session, &ReportId(report_id)) {
        Ok(analysis) => (StatusCode::OK, axum::Json(analysis)).into_response(),
        Err(error) => service_error(error),
    }
}

fn unauthorized(error: impl std::fmt::Display) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
}

fn service_error(error: InsightsServiceError) -> Response {
    let status = match &error {
        InsightsServiceError::Forbidden { .. } => StatusCode::FORBIDDEN,
        InsightsServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        InsightsServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::{Report, ReportBatch, ReportType};
    use axum::body::Body;
    use axum::http::Request;
    use chrono::{Duration, TimeZone};
    use serde_json::Value;
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct MemoryRepository {
        reports: Mutex<BTreeMap<ReportId, Report>>,
    }

    impl ReportRepository for MemoryRepository {
        fn insert(&self, report: Report) -> Result<Report, RepositoryError> {
            let mut guard = self.reports.lock().expect("repository mutex poisoned");
            guard.insert(report.id.clone(), report.clone());
            Ok(report)
        }

        fn fetch(&self, id: &ReportId) -> Result<Option<Report>, RepositoryError> {
            Ok(self
                .reports
                .lock()
                .expect("repository mutex poisoned")
                .get(id)
                .cloned())
        }

        fn reports_for_patient(
            &self,
            patient_id: &PatientId,
        ) -> Result<Vec<Report>, RepositoryError> {
            Ok(self
                .reports
                .lock()
                .expect("repository mutex poisoned")
                .values()
                .filter(|report| &report.patient_id == patient_id)
                .cloned()
                .collect())
        }
    }

    fn router() -> Router {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let service = Arc::new(ReportInsightsService::new(Arc::new(
            MemoryRepository::default(),
        )));
        service
            .ingest(ReportBatch {
                reports: vec![Report {
                    id: ReportId("r-1".to_string()),
                    patient_id: PatientId("p-1".to_string()),
                    report_type: ReportType::Radiology,
                    hospital: "General Hospital".to_string(),
                    created_at: now - Duration::days(10),
                    file_name: None,
                    description: None,
                }],
                rejected: Vec::new(),
            })
            .expect("seed succeeds");
        insights_router(service)
    }

    async fn read_json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn dashboard_route_returns_payload_for_owner() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/patients/p-1/dashboard?now=2025-06-01T12:00:00Z")
                    .header("x-portal-user", "p-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["summary"]["total_reports"], 1);
        assert_eq!(payload["summary"]["recent_activity"], 1);
        assert_eq!(payload["generated_at"], "2025-06-01T12:00:00Z");
        // 50 + recent activity + monthly average of 1.0
        assert_eq!(payload["metrics"]["health_score"], 70);
    }

    #[tokio::test]
    async fn dashboard_route_accepts_date_only_now() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/patients/p-1/dashboard?now=2025-06-01")
                    .header("x-portal-user", "p-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["generated_at"], "2025-06-01T00:00:00Z");
        assert_eq!(payload["summary"]["recent_activity"], 1);
    }

    #[tokio::test]
    async fn dashboard_route_rejects_unparseable_now() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/patients/p-1/dashboard?now=soon")
                    .header("x-portal-user", "p-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dashboard_route_requires_session_headers() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/patients/p-1/dashboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn dashboard_route_forbids_other_patients() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/patients/p-1/dashboard")
                    .header("x-portal-user", "p-9")
                    .header("x-portal-role", "patient")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn analysis_route_maps_missing_reports_to_not_found() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/reports/nope/analysis")
                    .header("x-portal-user", "d-1")
                    .header("x-portal-role", "doctor")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn analysis_route_returns_template_for_doctor() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/reports/r-1/analysis")
                    .header("x-portal-user", "d-1")
                    .header("x-portal-role", "doctor")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["report_type"], "radiology");
        assert!(payload["findings"].as_array().is_some_and(|items| !items.is_empty()));
    }
}
