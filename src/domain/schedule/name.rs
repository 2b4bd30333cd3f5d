//! Schedule names

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ScheduleValidationError;

/// Maximum length of a schedule name
pub const MAX_SCHEDULE_NAME_LENGTH: usize = 64;

static SCHEDULE_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-zA-Z\-_.]+$").unwrap());

/// Name of a schedule within its group
///
/// Schedules follow the scheduler's naming rule, which is looser than the
/// hosting service's: underscores and dots are allowed and there is no
/// restriction on the first or last character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScheduleName(String);

impl ScheduleName {
    pub fn new(name: impl Into<String>) -> Result<Self, ScheduleValidationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ScheduleValidationError::EmptyName);
        }

        if name.len() > MAX_SCHEDULE_NAME_LENGTH {
            return Err(ScheduleValidationError::NameTooLong {
                length: name.len(),
                max: MAX_SCHEDULE_NAME_LENGTH,
            });
        }

        if !SCHEDULE_NAME_PATTERN.is_match(&name) {
            return Err(ScheduleValidationError::InvalidName { name });
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ScheduleName {
    type Error = ScheduleValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ScheduleName> for String {
    fn from(name: ScheduleName) -> Self {
        name.0
    }
}

impl AsRef<str> for ScheduleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScheduleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
