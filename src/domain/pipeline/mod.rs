//! Request handlers that chain hosted models

mod config;
mod handler;
mod two_stage;

pub use config::{PipelineConfig, PromptTemplate, StageConfig, TEXT_PLACEHOLDER};
pub use handler::InferenceHandler;
pub use two_stage::TwoStagePipeline;
