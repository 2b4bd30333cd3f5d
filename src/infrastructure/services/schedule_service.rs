//! Schedule service - cron-driven capacity changes

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    CronExpression, DomainError, ScheduleAction, ScheduleControl, ScheduleName, ScheduleRecord,
};

/// Group, timezone and role every schedule is created with
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    pub group: String,
    pub timezone: String,
    pub role_arn: String,
}

#[derive(Debug)]
pub struct ScheduleService<S: ScheduleControl> {
    control: Arc<S>,
    settings: SchedulerSettings,
}

impl<S: ScheduleControl> ScheduleService<S> {
    pub fn new(control: Arc<S>, settings: SchedulerSettings) -> Self {
        Self { control, settings }
    }

    fn record(
        &self,
        name: &str,
        expression: &str,
        action: ScheduleAction,
    ) -> Result<ScheduleRecord, DomainError> {
        let name = ScheduleName::new(name)?;
        let expression = CronExpression::parse(expression)?;

        let record = ScheduleRecord::new(name, expression, action, self.settings.role_arn.clone())
            .with_group(self.settings.group.clone())
            .with_timezone(self.settings.timezone.clone());
        record.validate()?;

        Ok(record)
    }

    /// Set an inference component's copy count on a cron schedule
    pub async fn schedule_scaling(
        &self,
        name: &str,
        component: &str,
        expression: &str,
        copies: u32,
    ) -> Result<ScheduleRecord, DomainError> {
        let record = self
            .record(
                name,
                expression,
                ScheduleAction::ScaleComponent {
                    component: component.to_string(),
                    copy_count: copies,
                },
            )?
            .with_description(format!("Scale {} to {} copies", component, copies));

        self.control.create_schedule(&record).await?;
        info!(schedule = %record.name, expression = %record.expression, "Schedule created");

        Ok(record)
    }

    /// Set an endpoint variant's instance count on a cron schedule
    pub async fn schedule_endpoint_scaling(
        &self,
        name: &str,
        endpoint: &str,
        variant: &str,
        expression: &str,
        instances: u32,
    ) -> Result<ScheduleRecord, DomainError> {
        let record = self
            .record(
                name,
                expression,
                ScheduleAction::ScaleEndpoint {
                    endpoint: endpoint.to_string(),
                    variant: variant.to_string(),
                    instance_count: instances,
                },
            )?
            .with_description(format!("Scale {} to {} instances", endpoint, instances));

        self.control.create_schedule(&record).await?;
        info!(schedule = %record.name, expression = %record.expression, "Schedule created");

        Ok(record)
    }

    /// Delete a schedule from the configured group
    pub async fn remove(&self, name: &str) -> Result<(), DomainError> {
        self.control
            .delete_schedule(name, &self.settings.group)
            .await
    }
}
