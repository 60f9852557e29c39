use super::record::{validate_records, ReportBatch, ReportRecord};
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub enum ReportImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ReportImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportImportError::Io(err) => write!(f, "failed to read report export: {}", err),
            ReportImportError::Csv(err) => write!(f, "invalid report CSV data: {}", err),
        }
    }
}

impl std::error::Error for ReportImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportImportError::Io(err) => Some(err),
            ReportImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ReportImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ReportImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads report exports with the columns
/// `id,patient_id,report_type,hospital,created_at,file_name,description`.
/// Only `id`, `report_type`, `hospital` and `created_at` are required; extra
/// columns are ignored.
pub struct ReportImporter;

impl ReportImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ReportBatch, ReportImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ReportBatch, ReportImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for row in csv_reader.deserialize::<ReportRecord>() {
            records.push(row?);
        }

        let batch = validate_records(records);
        info!(
            accepted = batch.reports.len(),
            rejected = batch.rejected.len(),
            "report export imported"
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::ReportType;
    use std::io::Cursor;

    #[test]
    fn imports_rows_and_rejects_bad_timestamps() {
        let csv = "id,patient_id,report_type,hospital,created_at,file_name,description\n\
r-1,p-1,Radiology,General Hospital,2025-01-10T09:00:00Z,chest.pdf,Chest X-ray\n\
r-2,p-1,pathology,General Hospital,yesterday,,\n\
r-3,p-2,cardiology, Heart Center ,2025-02-01,,\n";

        let batch = ReportImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(batch.reports.len(), 2);
        assert_eq!(batch.reports[0].file_name.as_deref(), Some("chest.pdf"));
        assert_eq!(batch.reports[1].report_type, ReportType::Cardiology);
        assert_eq!(batch.reports[1].hospital, "Heart Center");
        assert_eq!(batch.reports[1].description, None);
        assert_eq!(batch.rejected.len(), 1);
        assert_eq!(batch.rejected[0].id.as_deref(), Some("r-2"));
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let csv = "id,report_type,hospital,created_at\nr-1,neurology,City Clinic,2025-01-10\n";
        let batch = ReportImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert!(batch.is_clean());
        assert_eq!(batch.reports[0].patient_id.0, "unassigned");
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = ReportImporter::from_path("./does-not-exist.csv").expect_err("expected io error");

        match error {
            ReportImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
