use chrono::{DateTime, Utc};
use medport::reports::{
    parse_timestamp, PatientId, Report, ReportId, ReportRepository, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Report store used until the hosted backend adapter is configured.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReportRepository {
    records: Arc<Mutex<BTreeMap<ReportId, Report>>>,
}

impl ReportRepository for InMemoryReportRepository {
    fn insert(&self, report: Report) -> Result<Report, RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        if guard.contains_key(&report.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(report.id.clone(), report.clone());
        Ok(report)
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<Report>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn reports_for_patient(&self, patient_id: &PatientId) -> Result<Vec<Report>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        let mut reports: Vec<Report> = guard
            .values()
            .filter(|report| &report.patient_id == patient_id)
            .cloned()
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> RepositoryError {
    RepositoryError::Unavailable("report store lock poisoned".to_string())
}

pub(crate) fn parse_timestamp_arg(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(raw).ok_or_else(|| {
        format!("failed to parse '{raw}' as an RFC 3339 timestamp or YYYY-MM-DD date")
    })
}
