//! Resource validation utilities

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::DomainError;

/// Maximum length for service resource names
pub const MAX_RESOURCE_NAME_LENGTH: usize = 63;

/// Alphanumeric segments joined by hyphens
static RESOURCE_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9](-*[a-zA-Z0-9])*$").unwrap());

/// Resource validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceValidationError {
    /// Name is empty
    EmptyName,
    /// Name exceeds maximum length
    NameTooLong { length: usize, max: usize },
    /// Name contains invalid characters
    InvalidNameFormat { name: String },
    /// Memory request is zero
    InvalidMemory,
    /// CPU request is not positive
    InvalidCpuCount { value: f32 },
    /// Copy count is zero
    InvalidCopyCount,
    /// Instance count is zero
    InvalidInstanceCount,
}

impl fmt::Display for ResourceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Resource name cannot be empty"),
            Self::NameTooLong { length, max } => {
                write!(f, "Resource name too long: {} characters (max {})", length, max)
            }
            Self::InvalidNameFormat { name } => write!(
                f,
                "Invalid resource name '{}': must be alphanumeric with hyphens, cannot start or end with hyphen",
                name
            ),
            Self::InvalidMemory => write!(f, "min_memory_mb must be greater than 0"),
            Self::InvalidCpuCount { value } => {
                write!(f, "Invalid cpu_count {}: must be greater than 0", value)
            }
            Self::InvalidCopyCount => write!(f, "copy_count must be at least 1"),
            Self::InvalidInstanceCount => {
                write!(f, "initial_instance_count must be at least 1")
            }
        }
    }
}

impl std::error::Error for ResourceValidationError {}

impl From<ResourceValidationError> for DomainError {
    fn from(err: ResourceValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// Validate a service resource name
pub fn validate_resource_name(name: &str) -> Result<(), ResourceValidationError> {
    if name.is_empty() {
        return Err(ResourceValidationError::EmptyName);
    }

    if name.len() > MAX_RESOURCE_NAME_LENGTH {
        return Err(ResourceValidationError::NameTooLong {
            length: name.len(),
            max: MAX_RESOURCE_NAME_LENGTH,
        });
    }

    if !RESOURCE_NAME_PATTERN.is_match(name) {
        return Err(ResourceValidationError::InvalidNameFormat {
            name: name.to_string(),
        });
    }

    Ok(())
}
