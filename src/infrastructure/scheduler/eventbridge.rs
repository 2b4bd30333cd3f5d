use async_trait::async_trait;
use aws_sdk_scheduler::types::{FlexibleTimeWindow, FlexibleTimeWindowMode, ScheduleState, Target};
use tracing::info;

use crate::domain::{DomainError, ScheduleControl, ScheduleRecord};
use crate::infrastructure::aws::map_sdk_error;

const PROVIDER: &str = "scheduler";

/// Real EventBridge Scheduler client
#[derive(Debug, Clone)]
pub struct EventBridgeScheduler {
    client: aws_sdk_scheduler::Client,
}

impl EventBridgeScheduler {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_scheduler::Client::new(config),
        }
    }

    pub fn from_client(client: aws_sdk_scheduler::Client) -> Self {
        Self { client }
    }
}

fn schedule_target(record: &ScheduleRecord) -> Result<Target, DomainError> {
    Target::builder()
        .arn(record.action.target_arn())
        .role_arn(&record.role_arn)
        .input(record.action.target_input()?)
        .build()
        .map_err(|e| DomainError::internal(format!("Failed to build Target: {}", e)))
}

fn time_window() -> Result<FlexibleTimeWindow, DomainError> {
    FlexibleTimeWindow::builder()
        .mode(FlexibleTimeWindowMode::Off)
        .build()
        .map_err(|e| DomainError::internal(format!("Failed to build FlexibleTimeWindow: {}", e)))
}

#[async_trait]
impl ScheduleControl for EventBridgeScheduler {
    async fn create_schedule(&self, record: &ScheduleRecord) -> Result<(), DomainError> {
        record.validate()?;

        info!(
            schedule = %record.name,
            group = %record.group,
            expression = %record.expression,
            timezone = %record.timezone,
            "Creating schedule"
        );

        let state = if record.enabled {
            ScheduleState::Enabled
        } else {
            ScheduleState::Disabled
        };

        self.client
            .create_schedule()
            .name(record.name.as_str())
            .group_name(&record.group)
            .schedule_expression(record.expression.to_string())
            .schedule_expression_timezone(&record.timezone)
            .flexible_time_window(time_window()?)
            .target(schedule_target(record)?)
            .state(state)
            .set_description(record.description.clone())
            .send()
            .await
            .map_err(|e| map_sdk_error(PROVIDER, "CreateSchedule", record.name.as_str(), e))?;

        Ok(())
    }

    async fn delete_schedule(&self, name: &str, group: &str) -> Result<(), DomainError> {
        info!(schedule = %name, group = %group, "Deleting schedule");

        self.client
            .delete_schedule()
            .name(name)
            .group_name(group)
            .send()
            .await
            .map_err(|e| map_sdk_error(PROVIDER, "DeleteSchedule", name, e))?;

        Ok(())
    }
}
