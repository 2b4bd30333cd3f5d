//! Deployment plans - what gets created on the service for one model

mod builder;
mod plan;

pub use builder::{
    DeploymentBuilder, DEFAULT_CONTAINER_STARTUP_TIMEOUT_SECS,
    DEFAULT_MODEL_DATA_DOWNLOAD_TIMEOUT_SECS, DEFAULT_VARIANT_NAME,
};
pub use plan::{
    DeploymentPlan, EndpointConfigSpec, EndpointSpec, InferenceComponentSpec, InstanceScaling,
    ModelSpec,
};
