//! Time-based schedules that change hosted capacity

mod control;
mod cron;
mod name;
mod record;

pub use control::ScheduleControl;
pub use cron::{CronExpression, ScheduleValidationError};
pub use name::{ScheduleName, MAX_SCHEDULE_NAME_LENGTH};
pub use record::{
    ScheduleAction, ScheduleRecord, DEFAULT_SCHEDULE_GROUP, DEFAULT_TIMEZONE,
    SCALE_COMPONENT_TARGET_ARN, SCALE_ENDPOINT_TARGET_ARN,
};

#[cfg(test)]
pub use control::MockScheduleControl;
