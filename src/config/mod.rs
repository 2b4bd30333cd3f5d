//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AwsConfig, DeploymentDefaults, LogFormat, LoggingConfig, SchedulerConfig,
};
