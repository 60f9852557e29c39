use super::{PatientId, Report, ReportId};

/// Storage abstraction so the service can be exercised without the hosted backend.
pub trait ReportRepository: Send + Sync {
    fn insert(&self, report: Report) -> Result<Report, RepositoryError>;
    fn fetch(&self, id: &ReportId) -> Result<Option<Report>, RepositoryError>;
    fn reports_for_patient(&self, patient_id: &PatientId) -> Result<Vec<Report>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("report already exists")]
    Conflict,
    #[error("report not found")]
    NotFound,
    #[error("report store unavailable: {0}")]
    Unavailable(String),
}
