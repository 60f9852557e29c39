pub mod config;
pub mod error;
pub mod insights;
pub mod reports;
pub mod router;
pub mod service;
pub mod session;
pub mod telemetry;

pub use insights::InsightsEngine;
pub use reports::{Report, ReportRecord};
pub use router::insights_router;
pub use service::{InsightsServiceError, ReportInsightsService};
pub use session::{PortalRole, PortalSession};
