//! Schedule commands - create and delete cron scaling schedules

use std::sync::Arc;

use anyhow::bail;
use clap::Args;

use super::{print_json, Context};
use crate::domain::deployment::DEFAULT_VARIANT_NAME;
use crate::infrastructure::scheduler::EventBridgeScheduler;
use crate::infrastructure::services::ScheduleService;

#[derive(Args, Clone)]
pub struct ScheduleArgs {
    /// Schedule name
    #[arg(long)]
    pub name: String,

    /// Inference component to scale
    #[arg(long, conflicts_with = "endpoint")]
    pub component: Option<String>,

    /// Endpoint whose instance count to scale
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Variant of the endpoint
    #[arg(long, default_value = DEFAULT_VARIANT_NAME)]
    pub variant: String,

    /// Cron expression, six fields, e.g. "0 20 ? * MON-FRI *"
    #[arg(long)]
    pub cron: String,

    /// Copies (component) or instances (endpoint) to scale to
    #[arg(long)]
    pub count: u32,
}

#[derive(Args, Clone)]
pub struct UnscheduleArgs {
    #[arg(long)]
    pub name: String,
}

fn service(ctx: &Context) -> ScheduleService<EventBridgeScheduler> {
    let settings = ctx
        .config
        .scheduler
        .settings(ctx.config.aws.execution_role_arn.as_deref());

    ScheduleService::new(Arc::new(EventBridgeScheduler::new(&ctx.sdk)), settings)
}

pub async fn run(args: ScheduleArgs) -> anyhow::Result<()> {
    let ctx = Context::load().await;
    let service = service(&ctx);

    let record = match (&args.component, &args.endpoint) {
        (Some(component), None) => {
            service
                .schedule_scaling(&args.name, component, &args.cron, args.count)
                .await?
        }
        (None, Some(endpoint)) => {
            service
                .schedule_endpoint_scaling(&args.name, endpoint, &args.variant, &args.cron, args.count)
                .await?
        }
        _ => bail!("Pass exactly one of --component or --endpoint"),
    };

    print_json(&record)
}

pub async fn run_delete(args: UnscheduleArgs) -> anyhow::Result<()> {
    let ctx = Context::load().await;
    service(&ctx).remove(&args.name).await?;

    println!("Deleted schedule {}", args.name);
    Ok(())
}
