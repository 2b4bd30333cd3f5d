//! llm-endpoint-kit
//!
//! Client-side tooling for hosting pretrained LLMs on a managed inference
//! service:
//! - Deployment plans mapping a model and a resource request to hosted resources
//! - Text-generation and chat payload helpers
//! - A two-stage handler chaining two hosted models
//! - Cron schedules that scale hosted capacity

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::DomainError;
