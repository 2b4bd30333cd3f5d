//! Validated service resource names

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_resource_name, ResourceValidationError, MAX_RESOURCE_NAME_LENGTH};

/// Format of the timestamp appended by [`ResourceName::unique`]
const UNIQUE_SUFFIX_FORMAT: &str = "%Y-%m-%d-%H-%M-%S-%3f";

/// Length of `-YYYY-MM-DD-HH-MM-SS-mmm`
const UNIQUE_SUFFIX_LENGTH: usize = 24;

/// Name of a model, endpoint, endpoint config or inference component
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceName(String);

impl ResourceName {
    /// Create a new ResourceName after validation
    pub fn new(name: impl Into<String>) -> Result<Self, ResourceValidationError> {
        let name = name.into();
        validate_resource_name(&name)?;
        Ok(Self(name))
    }

    /// Append a millisecond timestamp to `base`, truncating `base` so the
    /// result stays within the name length limit
    pub fn unique(base: &str) -> Result<Self, ResourceValidationError> {
        Self::unique_at(base, Utc::now())
    }

    pub fn unique_at(base: &str, at: DateTime<Utc>) -> Result<Self, ResourceValidationError> {
        let max_base = MAX_RESOURCE_NAME_LENGTH - UNIQUE_SUFFIX_LENGTH;
        let truncated: String = base.chars().take(max_base).collect();
        let truncated = truncated.trim_end_matches('-');

        Self::new(format!(
            "{}-{}",
            truncated,
            at.format(UNIQUE_SUFFIX_FORMAT)
        ))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ResourceName {
    type Error = ResourceValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResourceName> for String {
    fn from(name: ResourceName) -> Self {
        name.0
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    #[test]
    fn test_unique_appends_timestamp() {
        let name = ResourceName::unique_at("llama-2-7b", fixed_time()).unwrap();
        assert_eq!(name.as_str(), "llama-2-7b-2024-03-05-14-07-09-000");
    }

    #[test]
    fn test_unique_truncates_long_base() {
        let base = "m".repeat(80);
        let name = ResourceName::unique_at(&base, fixed_time()).unwrap();
        assert_eq!(name.as_str().len(), MAX_RESOURCE_NAME_LENGTH);
        assert!(name.as_str().ends_with("-2024-03-05-14-07-09-000"));
    }

    #[test]
    fn test_unique_does_not_leave_double_hyphen_at_cut() {
        let base = format!("{}-tail", "a".repeat(38));
        let name = ResourceName::unique_at(&base, fixed_time()).unwrap();
        assert!(name.as_str().starts_with(&format!("{}-2024", "a".repeat(38))));
    }

    #[test]
    fn test_serde_rejects_invalid_name() {
        let result: Result<ResourceName, _> = serde_json::from_str("\"bad_name\"");
        assert!(result.is_err());

        let name: ResourceName = serde_json::from_str("\"good-name\"").unwrap();
        assert_eq!(name.as_str(), "good-name");
    }
}
