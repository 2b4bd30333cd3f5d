//! Status command

use std::sync::Arc;

use anyhow::bail;
use clap::Args;

use super::Context;
use crate::infrastructure::sagemaker::SageMakerControl;
use crate::infrastructure::services::DeploymentService;

#[derive(Args, Clone)]
pub struct StatusArgs {
    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub component: Option<String>,
}

pub async fn run(args: StatusArgs) -> anyhow::Result<()> {
    if args.endpoint.is_none() && args.component.is_none() {
        bail!("Pass --endpoint and/or --component");
    }

    let ctx = Context::load().await;
    let control = Arc::new(SageMakerControl::new(&ctx.sdk));
    let service = DeploymentService::new(control, ctx.config.deployment.wait_config());

    if let Some(endpoint) = &args.endpoint {
        let status = service.endpoint_status(endpoint).await?;
        println!("endpoint {}: {}", endpoint, status);
    }

    if let Some(component) = &args.component {
        let status = service.component_status(component).await?;
        println!("component {}: {}", component, status);
    }

    Ok(())
}
