//! Teardown command - delete what `deploy` created

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Args;

use super::Context;
use crate::infrastructure::sagemaker::SageMakerControl;
use crate::infrastructure::services::{DeploymentHandle, DeploymentService};

#[derive(Args, Clone)]
pub struct TeardownArgs {
    /// Handle file written by `deploy --output`
    #[arg(long)]
    pub handle: PathBuf,
}

pub async fn run(args: TeardownArgs) -> anyhow::Result<()> {
    let raw = std::fs::read(&args.handle)
        .with_context(|| format!("Failed to read {}", args.handle.display()))?;
    let handle: DeploymentHandle =
        serde_json::from_slice(&raw).context("Invalid deployment handle")?;

    let ctx = Context::load().await;
    let control = Arc::new(SageMakerControl::new(&ctx.sdk));
    let service = DeploymentService::new(control, ctx.config.deployment.wait_config());

    service.teardown(&handle).await?;

    println!("Deleted endpoint {}", handle.endpoint_name);
    Ok(())
}
