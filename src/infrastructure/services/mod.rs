//! Infrastructure services

mod deployment_service;
mod schedule_service;

pub use deployment_service::{DeploymentHandle, DeploymentService, WaitConfig};
pub use schedule_service::{ScheduleService, SchedulerSettings};
