//! SageMaker-backed control plane and runtime

mod control;
mod runtime;

pub use control::SageMakerControl;
pub use runtime::SageMakerInvoker;

const PROVIDER: &str = "sagemaker";
