//! Chain command - run a two-stage pipeline

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;

use super::Context;
use crate::domain::{InferenceHandler, PipelineConfig, TextGenerationRequest, TwoStagePipeline};
use crate::infrastructure::observability::InstrumentedHandler;
use crate::infrastructure::sagemaker::SageMakerInvoker;

#[derive(Args, Clone)]
pub struct ChainArgs {
    /// Pipeline config (JSON)
    #[arg(long)]
    pub config: PathBuf,

    /// Text for the first stage; the request body is read from stdin when unset
    #[arg(long)]
    pub input: Option<String>,
}

pub async fn run(args: ChainArgs) -> anyhow::Result<()> {
    let ctx = Context::load().await;

    let config = PipelineConfig::from_file(&args.config)?;
    let pipeline = TwoStagePipeline::new(SageMakerInvoker::new(&ctx.sdk), config)?;
    let handler = InstrumentedHandler::new("two-stage", pipeline);

    let body = match args.input {
        Some(text) => serde_json::to_vec(&TextGenerationRequest::new(text))?,
        None => {
            let mut body = Vec::new();
            std::io::stdin()
                .read_to_end(&mut body)
                .context("Failed to read request body from stdin")?;
            body
        }
    };

    let response = handler.handle(body).await?;
    println!("{}", String::from_utf8_lossy(&response));

    Ok(())
}
