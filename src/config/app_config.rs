use std::time::Duration;

use serde::Deserialize;

use crate::domain::schedule::{DEFAULT_SCHEDULE_GROUP, DEFAULT_TIMEZONE};
use crate::domain::ContainerImage;
use crate::infrastructure::services::{SchedulerSettings, WaitConfig};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub aws: AwsConfig,
    pub logging: LoggingConfig,
    pub deployment: DeploymentDefaults,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    /// Region override; the SDK's provider chain is used when unset
    pub region: Option<String>,
    /// Role the hosted model runs as
    pub execution_role_arn: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeploymentDefaults {
    pub instance_type: String,
    pub initial_instance_count: u32,
    pub container: ContainerImage,
    pub startup_timeout_secs: u64,
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub group_name: String,
    pub timezone: String,
    /// Role the scheduler assumes to call the hosting service
    pub role_arn: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DeploymentDefaults {
    fn default() -> Self {
        Self {
            instance_type: "ml.g5.2xlarge".to_string(),
            initial_instance_count: 1,
            container: ContainerImage::default(),
            startup_timeout_secs: 3600,
            poll_interval_secs: 30,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            group_name: DEFAULT_SCHEDULE_GROUP.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            role_arn: None,
        }
    }
}

impl DeploymentDefaults {
    pub fn wait_config(&self) -> WaitConfig {
        WaitConfig {
            poll_interval: Duration::from_secs(self.poll_interval_secs.max(1)),
            timeout: Duration::from_secs(self.startup_timeout_secs),
        }
    }
}

impl SchedulerConfig {
    /// Settings for the schedule service; the role falls back to `fallback_role`
    pub fn settings(&self, fallback_role: Option<&str>) -> SchedulerSettings {
        SchedulerSettings {
            group: self.group_name.clone(),
            timezone: self.timezone.clone(),
            role_arn: self
                .role_arn
                .clone()
                .or_else(|| fallback_role.map(str::to_string))
                .unwrap_or_default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
