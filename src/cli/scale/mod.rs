//! Scale command - set an inference component's copy count

use std::sync::Arc;

use clap::Args;

use super::Context;
use crate::infrastructure::sagemaker::SageMakerControl;
use crate::infrastructure::services::DeploymentService;

#[derive(Args, Clone)]
pub struct ScaleArgs {
    #[arg(long)]
    pub component: String,

    /// Desired copies; 0 releases the component's accelerators
    #[arg(long)]
    pub copies: u32,

    /// Wait until the component is back in service
    #[arg(long)]
    pub wait: bool,
}

pub async fn run(args: ScaleArgs) -> anyhow::Result<()> {
    let ctx = Context::load().await;
    let control = Arc::new(SageMakerControl::new(&ctx.sdk));
    let service = DeploymentService::new(control, ctx.config.deployment.wait_config());

    if args.wait && args.copies > 0 {
        service.scale_and_wait(&args.component, args.copies).await?;
    } else {
        service.scale(&args.component, args.copies).await?;
    }

    println!("{} -> {} copies", args.component, args.copies);
    Ok(())
}
