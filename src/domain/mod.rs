//! Domain layer - Deployment plans, payloads, pipelines and schedules

pub mod deployment;
pub mod endpoint;
pub mod error;
pub mod inference;
pub mod model;
pub mod pipeline;
pub mod resource;
pub mod schedule;

pub use deployment::{
    DeploymentBuilder, DeploymentPlan, EndpointConfigSpec, EndpointSpec, InferenceComponentSpec,
    InstanceScaling, ModelSpec,
};
pub use endpoint::{EndpointControl, EndpointInvoker, EndpointStatus, InvocationTarget};
pub use error::DomainError;
pub use inference::{
    chat_payload, extract_chat_content, extract_generated_text, format_instruction_prompt,
    strip_prompt_echo, text_generation_payload, ChatMessage, ChatRequest, ChatResponse,
    GeneratedText, GenerationParameters, MessageRole, TextGenerationRequest,
    TextGenerationResponse,
};
pub use model::{container_environment, ContainerImage, ModelReference, ServingOptions};
pub use pipeline::{InferenceHandler, PipelineConfig, PromptTemplate, StageConfig, TwoStagePipeline};
pub use resource::{ResourceName, ResourceRequest, ResourceValidationError};
pub use schedule::{
    CronExpression, ScheduleAction, ScheduleControl, ScheduleName, ScheduleRecord,
    ScheduleValidationError,
};
