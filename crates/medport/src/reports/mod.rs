//! Medical report records as the portal receives them, plus the ingestion
//! boundary that turns loosely typed rows into validated [`Report`]s.

pub mod analysis;
mod import;
mod record;
pub mod repository;

pub use analysis::{analyze_report, ReportAnalysis};
pub use import::{ReportImportError, ReportImporter};
pub use record::{
    deserialize_optional_timestamp, parse_timestamp, validate_records, RecordError,
    RejectedReport, ReportBatch, ReportRecord,
};
pub use repository::{ReportRepository, RepositoryError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReportId(pub String);

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatientId(pub String);

impl PatientId {
    pub const UNASSIGNED: &'static str = "unassigned";
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of study a report belongs to. The set is open: anything outside the
/// four departments the portal knows about is kept verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReportType {
    Radiology,
    Pathology,
    Cardiology,
    Neurology,
    Other(String),
}

impl ReportType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Radiology => "radiology",
            Self::Pathology => "pathology",
            Self::Cardiology => "cardiology",
            Self::Neurology => "neurology",
            Self::Other(value) => value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Radiology => "Radiology",
            Self::Pathology => "Pathology",
            Self::Cardiology => "Cardiology",
            Self::Neurology => "Neurology",
            Self::Other(value) => value,
        }
    }
}

impl From<&str> for ReportType {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "radiology" => Self::Radiology,
            "pathology" => Self::Pathology,
            "cardiology" => Self::Cardiology,
            "neurology" => Self::Neurology,
            _ => Self::Other(normalized),
        }
    }
}

impl From<String> for ReportType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<ReportType> for String {
    fn from(value: ReportType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated report. Only `report_type`, `hospital` and `created_at` feed
/// the insights engine; the rest is carried for the portal views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub patient_id: PatientId,
    pub report_type: ReportType,
    pub hospital: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
