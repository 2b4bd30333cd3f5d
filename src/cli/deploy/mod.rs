//! Deploy command - build a plan and create it on the service

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context as _};
use clap::{ArgGroup, Args};
use tracing::info;

use super::{print_json, Context};
use crate::domain::{
    ContainerImage, DeploymentBuilder, ModelReference, ResourceRequest, ServingOptions,
};
use crate::infrastructure::sagemaker::SageMakerControl;
use crate::infrastructure::services::DeploymentService;

#[derive(Args, Clone)]
#[command(group(ArgGroup::new("source").required(true).args(["model_id", "model_data"])))]
pub struct DeployArgs {
    /// Hub model id, e.g. meta-llama/Llama-2-7b-chat-hf
    #[arg(long, conflicts_with = "model_data")]
    pub model_id: Option<String>,

    /// Hub revision
    #[arg(long, requires = "model_id")]
    pub revision: Option<String>,

    /// S3 URI of pre-packaged model data
    #[arg(long)]
    pub model_data: Option<String>,

    /// Base for generated resource names (defaults to the model name)
    #[arg(long, default_value = "")]
    pub name: String,

    /// Instance type (overrides config)
    #[arg(long)]
    pub instance_type: Option<String>,

    /// Initial instance count (overrides config)
    #[arg(long)]
    pub instance_count: Option<u32>,

    /// Enable managed instance scaling between MIN and MAX instances
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    pub instance_scaling: Option<Vec<u32>>,

    /// Memory reserved per copy, in MB
    #[arg(long, default_value_t = 1024)]
    pub memory_mb: u32,

    /// Accelerators per copy
    #[arg(long)]
    pub accelerators: Option<u32>,

    /// CPU cores per copy
    #[arg(long)]
    pub cpus: Option<f32>,

    /// Number of copies
    #[arg(long, default_value_t = 1)]
    pub copies: u32,

    /// Serving image URI (overrides the configured container)
    #[arg(long)]
    pub image: Option<String>,

    #[arg(long)]
    pub max_input_length: Option<u32>,

    #[arg(long)]
    pub max_total_tokens: Option<u32>,

    #[arg(long)]
    pub max_batch_prefill_tokens: Option<u32>,

    /// Print the plan without creating anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write the deployment handle to this file
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl DeployArgs {
    fn model_reference(&self) -> anyhow::Result<ModelReference> {
        match (&self.model_id, &self.model_data) {
            (Some(id), None) => Ok(match &self.revision {
                Some(revision) => ModelReference::hub_revision(id, revision),
                None => ModelReference::hub(id),
            }),
            (None, Some(uri)) => Ok(ModelReference::artifact(uri)),
            _ => bail!("Pass exactly one of --model-id or --model-data"),
        }
    }

    fn resources(&self) -> ResourceRequest {
        let mut resources = ResourceRequest::new(self.memory_mb).with_copies(self.copies);
        if let Some(accelerators) = self.accelerators {
            resources = resources.with_accelerators(accelerators);
        }
        if let Some(cpus) = self.cpus {
            resources = resources.with_cpus(cpus);
        }
        resources
    }

    fn serving(&self) -> ServingOptions {
        let mut serving = ServingOptions::new();
        serving.max_input_length = self.max_input_length;
        serving.max_total_tokens = self.max_total_tokens;
        serving.max_batch_prefill_tokens = self.max_batch_prefill_tokens;
        serving.hub_token = std::env::var("HF_TOKEN").ok().filter(|t| !t.is_empty());
        serving
    }
}

pub async fn run(args: DeployArgs) -> anyhow::Result<()> {
    let ctx = Context::load().await;
    let defaults = &ctx.config.deployment;

    let container = match &args.image {
        Some(uri) => ContainerImage::uri(uri),
        None => defaults.container.clone(),
    };

    let mut builder = DeploymentBuilder::new(args.name.clone(), args.model_reference()?)
        .container(container)
        .resources(args.resources())
        .serving(args.serving())
        .instance_type(
            args.instance_type
                .clone()
                .unwrap_or_else(|| defaults.instance_type.clone()),
        )
        .initial_instance_count(args.instance_count.unwrap_or(defaults.initial_instance_count));

    if let Some(role) = &ctx.config.aws.execution_role_arn {
        builder = builder.execution_role(role);
    }
    if let Some(region) = ctx.region() {
        builder = builder.region(region);
    }
    if let Some(bounds) = &args.instance_scaling {
        builder = builder.instance_scaling(bounds[0], bounds[1]);
    }

    let plan = builder.build()?;

    if args.dry_run {
        return print_json(&plan);
    }

    let control = Arc::new(SageMakerControl::new(&ctx.sdk));
    let service = DeploymentService::new(control, defaults.wait_config());

    info!(endpoint = %plan.endpoint.name, "Deploying");
    let handle = service.deploy(&plan).await?;

    if let Some(path) = &args.output {
        std::fs::write(path, serde_json::to_vec_pretty(&handle)?)
            .with_context(|| format!("Failed to write handle to {}", path.display()))?;
    }

    print_json(&handle)
}
