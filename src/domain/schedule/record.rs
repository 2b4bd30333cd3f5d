//! Schedule records and the capacity actions they trigger

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{CronExpression, ScheduleName};
use crate::domain::DomainError;

pub const DEFAULT_SCHEDULE_GROUP: &str = "default";

pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Universal target that sets an inference component's copy count
pub const SCALE_COMPONENT_TARGET_ARN: &str =
    "arn:aws:scheduler:::aws-sdk:sagemaker:updateInferenceComponentRuntimeConfig";

/// Universal target that sets a variant's instance count
pub const SCALE_ENDPOINT_TARGET_ARN: &str =
    "arn:aws:scheduler:::aws-sdk:sagemaker:updateEndpointWeightsAndCapacities";

/// What a schedule does when it fires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScheduleAction {
    /// Set the number of copies of an inference component
    ScaleComponent { component: String, copy_count: u32 },
    /// Set the number of instances behind an endpoint variant
    ScaleEndpoint {
        endpoint: String,
        variant: String,
        instance_count: u32,
    },
}

impl ScheduleAction {
    pub fn target_arn(&self) -> &'static str {
        match self {
            Self::ScaleComponent { .. } => SCALE_COMPONENT_TARGET_ARN,
            Self::ScaleEndpoint { .. } => SCALE_ENDPOINT_TARGET_ARN,
        }
    }

    /// Request the scheduler sends to the target API
    pub fn target_input(&self) -> Result<String, DomainError> {
        let input = match self {
            Self::ScaleComponent {
                component,
                copy_count,
            } => json!({
                "InferenceComponentName": component,
                "DesiredRuntimeConfig": { "CopyCount": copy_count }
            }),
            Self::ScaleEndpoint {
                endpoint,
                variant,
                instance_count,
            } => json!({
                "EndpointName": endpoint,
                "DesiredWeightsAndCapacities": [{
                    "VariantName": variant,
                    "DesiredInstanceCount": instance_count
                }]
            }),
        };

        Ok(serde_json::to_string(&input)?)
    }
}

/// A cron schedule and the action it triggers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub name: ScheduleName,
    #[serde(default = "default_group")]
    pub group: String,
    pub expression: CronExpression,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub action: ScheduleAction,
    /// Role the scheduler assumes to call the target
    pub role_arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_group() -> String {
    DEFAULT_SCHEDULE_GROUP.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_enabled() -> bool {
    true
}

impl ScheduleRecord {
    pub fn new(
        name: ScheduleName,
        expression: CronExpression,
        action: ScheduleAction,
        role_arn: impl Into<String>,
    ) -> Self {
        Self {
            name,
            group: default_group(),
            expression,
            timezone: default_timezone(),
            action,
            role_arn: role_arn.into(),
            description: None,
            enabled: default_enabled(),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.role_arn.trim().is_empty() {
            return Err(DomainError::configuration("Schedule role ARN is required"));
        }

        if self.group.trim().is_empty() {
            return Err(DomainError::validation("Schedule group cannot be empty"));
        }

        if self.timezone.trim().is_empty() {
            return Err(DomainError::validation("Schedule timezone cannot be empty"));
        }

        Ok(())
    }
}
