use crate::reports::PatientId;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

pub const USER_HEADER: &str = "x-portal-user";
pub const ROLE_HEADER: &str = "x-portal-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalRole {
    Patient,
    Doctor,
}

impl PortalRole {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "patient" => Some(Self::Patient),
            "doctor" => Some(Self::Doctor),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Doctor => "Doctor",
        }
    }
}

/// The signed-in portal user. Created once the identity provider has
/// authenticated the caller and handed to every call that reads reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalSession {
    pub user_id: String,
    pub role: PortalRole,
}

impl PortalSession {
    pub fn patient(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: PortalRole::Patient,
        }
    }

    pub fn doctor(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: PortalRole::Doctor,
        }
    }

    /// Patients only see their own reports; doctors see any patient's.
    pub fn can_view(&self, patient_id: &PatientId) -> bool {
        match self.role {
            PortalRole::Doctor => true,
            PortalRole::Patient => self.user_id == patient_id.0,
        }
    }

    /// Reads the identity forwarded by the auth gateway in front of the service.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, SessionError> {
        let user_id = headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(SessionError::MissingUser)?;

        let raw_role = headers
            .get(ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("patient");
        let role =
            PortalRole::parse(raw_role).ok_or_else(|| SessionError::UnknownRole(raw_role.to_string()))?;

        Ok(Self {
            user_id: user_id.to_string(),
            role,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("missing `x-portal-user` header")]
    MissingUser,
    #[error("unknown portal role '{0}'")]
    UnknownRole(String),
}
