use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::ScheduleRecord;
use crate::domain::DomainError;

/// Creates and deletes schedules on the service's scheduler
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ScheduleControl: Send + Sync {
    async fn create_schedule(&self, record: &ScheduleRecord) -> Result<(), DomainError>;

    async fn delete_schedule(&self, name: &str, group: &str) -> Result<(), DomainError>;
}
