//! Control-plane operations on hosted models and endpoints

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::EndpointStatus;
use crate::domain::deployment::{
    EndpointConfigSpec, EndpointSpec, InferenceComponentSpec, ModelSpec,
};
use crate::domain::DomainError;

/// Create, inspect, scale and delete hosted resources
///
/// Deleting a resource that does not exist returns
/// [`DomainError::NotFound`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EndpointControl: Send + Sync {
    /// Registers a model (container image + environment)
    async fn create_model(&self, spec: &ModelSpec) -> Result<(), DomainError>;

    /// Registers the instance fleet an endpoint runs on
    async fn create_endpoint_config(&self, spec: &EndpointConfigSpec) -> Result<(), DomainError>;

    /// Starts provisioning an endpoint
    async fn create_endpoint(&self, spec: &EndpointSpec) -> Result<(), DomainError>;

    /// Current status of an endpoint
    async fn describe_endpoint(&self, name: &str) -> Result<EndpointStatus, DomainError>;

    /// Places a model on an endpoint with its own resources and copy count
    async fn create_inference_component(
        &self,
        spec: &InferenceComponentSpec,
    ) -> Result<(), DomainError>;

    /// Current status of an inference component
    async fn describe_inference_component(
        &self,
        name: &str,
    ) -> Result<EndpointStatus, DomainError>;

    /// Sets the number of copies of an inference component
    async fn update_copy_count(&self, component: &str, copies: u32) -> Result<(), DomainError>;

    async fn delete_inference_component(&self, name: &str) -> Result<(), DomainError>;

    async fn delete_endpoint(&self, name: &str) -> Result<(), DomainError>;

    async fn delete_endpoint_config(&self, name: &str) -> Result<(), DomainError>;

    async fn delete_model(&self, name: &str) -> Result<(), DomainError>;
}
