use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::insights::{HealthDashboard, InsightsEngine};
use crate::reports::{
    analyze_report, PatientId, ReportAnalysis, ReportBatch, ReportId, ReportRepository,
    RepositoryError,
};
use crate::session::PortalSession;

/// Service composing the report repository, session checks and the insights engine.
pub struct ReportInsightsService<R> {
    repository: Arc<R>,
}

impl<R> ReportInsightsService<R>
where
    R: ReportRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Store every validated report in the batch, skipping ids already present.
    pub fn ingest(&self, batch: ReportBatch) -> Result<usize, InsightsServiceError> {
        let mut inserted = 0;
        for report in batch.reports {
            let id = report.id.clone();
            match self.repository.insert(report) {
                Ok(_) => inserted += 1,
                Err(RepositoryError::Conflict) => {
                    warn!(report_id = %id, "skipping duplicate report");
                }
                Err(err) => return Err(err.into()),
            }
        }

        info!(
            inserted,
            rejected = batch.rejected.len(),
            "report batch ingested"
        );
        Ok(inserted)
    }

    pub fn dashboard(
        &self,
        session: &PortalSession,
        patient_id: &PatientId,
        now: DateTime<Utc>,
    ) -> Result<HealthDashboard, InsightsServiceError> {
        ensure_can_view(session, patient_id)?;

        let reports = self.repository.reports_for_patient(patient_id)?;
        let dashboard = InsightsEngine::new(&reports, now).dashboard();

        debug!(
            patient_id = %patient_id,
            reports = reports.len(),
            health_score = dashboard.metrics.health_score,
            insights = dashboard.insights.len(),
            "dashboard computed"
        );
        Ok(dashboard)
    }

    pub fn analysis(
        &self,
        session: &PortalSession,
        report_id: &ReportId,
    ) -> Result<ReportAnalysis, InsightsServiceError> {
        let report = self
            .repository
            .fetch(report_id)?
            .ok_or(RepositoryError::NotFound)?;
        ensure_can_view(session, &report.patient_id)?;

        Ok(analyze_report(&report))
    }
}

fn ensure_can_view(
    session: &PortalSession,
    patient_id: &PatientId,
) -> Result<(), InsightsServiceError> {
    if session.can_view(patient_id) {
        return Ok(());
    }

    warn!(
        user_id = %session.user_id,
        role = session.role.label(),
        patient_id = %patient_id,
        "denied access to another patient's reports"
    );
    Err(InsightsServiceError::Forbidden {
        patient_id: patient_id.clone(),
    })
}

/// Error raised by the insights service.
#[derive(Debug, thiserror::Error)]
pub enum InsightsServiceError {
    #[error("session may not read reports for patient {patient_id}")]
    Forbidden { patient_id: PatientId },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
