//! Infrastructure layer - External service implementations

pub mod aws;
pub mod logging;
pub mod observability;
pub mod sagemaker;
pub mod scheduler;
pub mod services;
