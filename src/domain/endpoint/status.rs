use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status reported for endpoints and inference components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointStatus {
    OutOfService,
    Creating,
    Updating,
    SystemUpdating,
    RollingBack,
    InService,
    Deleting,
    Failed(Option<String>),
    Unknown(String),
}

impl EndpointStatus {
    /// Map the service's status string, attaching the failure reason when
    /// the status is a failure
    pub fn from_service(status: &str, failure_reason: Option<&str>) -> Self {
        match status {
            "OutOfService" => Self::OutOfService,
            "Creating" => Self::Creating,
            "Updating" => Self::Updating,
            "SystemUpdating" => Self::SystemUpdating,
            "RollingBack" => Self::RollingBack,
            "InService" => Self::InService,
            "Deleting" => Self::Deleting,
            "Failed" | "UpdateRollbackFailed" => {
                Self::Failed(failure_reason.map(str::to_string))
            }
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Waiting on a resource stops at these states
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::InService | Self::Failed(_))
    }

    pub fn is_in_service(&self) -> bool {
        matches!(self, Self::InService)
    }
}

impl fmt::Display for EndpointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfService => write!(f, "OutOfService"),
            Self::Creating => write!(f, "Creating"),
            Self::Updating => write!(f, "Updating"),
            Self::SystemUpdating => write!(f, "SystemUpdating"),
            Self::RollingBack => write!(f, "RollingBack"),
            Self::InService => write!(f, "InService"),
            Self::Deleting => write!(f, "Deleting"),
            Self::Failed(Some(reason)) => write!(f, "Failed ({})", reason),
            Self::Failed(None) => write!(f, "Failed"),
            Self::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}
