//! CLI module for llm-endpoint-kit
//!
//! One subcommand per deployment step:
//! - `deploy`: package a model and stand up an endpoint for it
//! - `invoke` / `chain`: call one hosted model, or two in sequence
//! - `scale` / `schedule` / `unschedule`: change capacity now or on a cron
//! - `status` / `teardown`: inspect and clean up

pub mod chain;
pub mod deploy;
pub mod invoke;
pub mod scale;
pub mod schedule;
pub mod status;
pub mod teardown;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::AppConfig;
use crate::infrastructure::{aws, logging};

/// Deploy, chain and schedule hosted LLM endpoints
#[derive(Parser)]
#[command(name = "llm-endpoint-kit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Deploy a pretrained model to a new endpoint
    Deploy(deploy::DeployArgs),

    /// Send one prompt to a hosted model
    Invoke(invoke::InvokeArgs),

    /// Run a two-stage pipeline across two hosted models
    Chain(chain::ChainArgs),

    /// Set the copy count of an inference component
    Scale(scale::ScaleArgs),

    /// Create a cron schedule that scales an inference component
    Schedule(schedule::ScheduleArgs),

    /// Delete a schedule
    Unschedule(schedule::UnscheduleArgs),

    /// Show endpoint or inference component status
    Status(status::StatusArgs),

    /// Delete everything a deployment created
    Teardown(teardown::TeardownArgs),
}

/// Configuration and AWS SDK config shared by every command
pub struct Context {
    pub config: AppConfig,
    pub sdk: aws_config::SdkConfig,
}

impl Context {
    pub async fn load() -> Self {
        dotenvy::dotenv().ok();

        let (config, load_error) = match AppConfig::load() {
            Ok(config) => (config, None),
            Err(e) => (AppConfig::default(), Some(e)),
        };

        logging::init_logging(&config.logging);
        if let Some(e) = load_error {
            warn!(error = %e, "Failed to load configuration, using defaults");
        }

        let sdk = aws::load_sdk_config(config.aws.region.as_deref()).await;

        Self { config, sdk }
    }

    /// Region from configuration, falling back to the SDK's resolved region
    pub fn region(&self) -> Option<String> {
        self.config
            .aws
            .region
            .clone()
            .or_else(|| self.sdk.region().map(|r| r.to_string()))
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
