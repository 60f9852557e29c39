use super::{PatientId, Report, ReportId, ReportType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Report row as it arrives from the portal store export or a JSON body,
/// before any field has been checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub patient_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub report_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub hospital: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub file_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("`created_at` value '{0}' is not a recognised timestamp")]
    InvalidTimestamp(String),
}

impl TryFrom<ReportRecord> for Report {
    type Error = RecordError;

    fn try_from(record: ReportRecord) -> Result<Self, Self::Error> {
        let id = required(record.id, "id")?;
        let report_type = required(record.report_type, "report_type")?;
        let hospital = required(record.hospital, "hospital")?;
        let raw_created_at = required(record.created_at, "created_at")?;
        let created_at = parse_timestamp(&raw_created_at)
            .ok_or_else(|| RecordError::InvalidTimestamp(raw_created_at.clone()))?;

        let patient_id = record
            .patient_id
            .map(|value| value.trim().to_string())
            .unwrap_or_else(|| PatientId::UNASSIGNED.to_string());

        Ok(Report {
            id: ReportId(id),
            patient_id: PatientId(patient_id),
            report_type: ReportType::from(report_type.as_str()),
            hospital,
            created_at,
            file_name: record.file_name,
            description: record.description,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, RecordError> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(RecordError::MissingField(field))
}

/// A record that was dropped before aggregation, with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedReport {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub reason: String,
}

/// Outcome of validating a set of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportBatch {
    pub reports: Vec<Report>,
    pub rejected: Vec<RejectedReport>,
}

impl ReportBatch {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Validate every record independently; invalid ones are reported, never
/// passed on with placeholder values.
pub fn validate_records<I>(records: I) -> ReportBatch
where
    I: IntoIterator<Item = ReportRecord>,
{
    let mut batch = ReportBatch::default();

    for (index, record) in records.into_iter().enumerate() {
        let id = record.id.clone();
        match Report::try_from(record) {
            Ok(report) => batch.reports.push(report),
            Err(err) => {
                warn!(index, id = id.as_deref().unwrap_or("-"), error = %err, "rejecting report record");
                batch.rejected.push(RejectedReport {
                    index,
                    id,
                    reason: err.to_string(),
                });
            }
        }
    }

    batch
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts RFC 3339, a naive `YYYY-MM-DD HH:MM:SS[.f]` (read as UTC) or a bare date.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    None
}

/// Serde adapter for optional timestamps in query strings and JSON bodies,
/// accepting the same formats as [`parse_timestamp`].
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| {
        parse_timestamp(&value).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "failed to parse '{value}' as an RFC 3339 timestamp or YYYY-MM-DD date"
            ))
        })
    })
    .transpose()
}
