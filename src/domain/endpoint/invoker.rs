//! Runtime invocation of hosted models

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Content type of every request and response body
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Endpoint, and optionally the inference component on it, that serves a call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationTarget {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

impl InvocationTarget {
    pub fn endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            component: None,
        }
    }

    pub fn component(endpoint: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            component: Some(component.into()),
        }
    }

    /// Metrics label for the component, `-` when the endpoint serves one model
    pub fn component_label(&self) -> &str {
        self.component.as_deref().unwrap_or("-")
    }
}

impl std::fmt::Display for InvocationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.component {
            Some(ref component) => write!(f, "{}/{}", self.endpoint, component),
            None => write!(f, "{}", self.endpoint),
        }
    }
}

/// Sends a JSON body to a hosted model and returns the raw response body
#[async_trait]
pub trait EndpointInvoker: Send + Sync + std::fmt::Debug {
    async fn invoke(
        &self,
        target: &InvocationTarget,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, DomainError>;
}
