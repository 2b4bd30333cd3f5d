//! EventBridge Scheduler-backed schedules

mod eventbridge;

pub use eventbridge::EventBridgeScheduler;
