//! Fixed configuration of a two-stage pipeline

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, GenerationParameters, InvocationTarget};

/// Placeholder replaced by the first stage's output
pub const TEXT_PLACEHOLDER: &str = "{text}";

/// Template for the second stage's input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PromptTemplate(String);

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self, DomainError> {
        let template = template.into();

        if !template.contains(TEXT_PLACEHOLDER) {
            return Err(DomainError::validation(format!(
                "Prompt template must contain '{}'",
                TEXT_PLACEHOLDER
            )));
        }

        Ok(Self(template))
    }

    pub fn render(&self, text: &str) -> String {
        self.0.replace(TEXT_PLACEHOLDER, text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self(TEXT_PLACEHOLDER.to_string())
    }
}

impl TryFrom<String> for PromptTemplate {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PromptTemplate> for String {
    fn from(template: PromptTemplate) -> Self {
        template.0
    }
}

/// One stage: which component serves it and how it generates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Inference component on the endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,

    /// Endpoint override; the pipeline's endpoint is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_name: Option<String>,

    #[serde(default)]
    pub parameters: GenerationParameters,
}

impl StageConfig {
    pub fn component(component: impl Into<String>) -> Self {
        Self {
            component: Some(component.into()),
            ..Default::default()
        }
    }

    pub fn with_parameters(mut self, parameters: GenerationParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_endpoint(mut self, endpoint_name: impl Into<String>) -> Self {
        self.endpoint_name = Some(endpoint_name.into());
        self
    }

    pub fn target(&self, default_endpoint: &str) -> InvocationTarget {
        InvocationTarget {
            endpoint: self
                .endpoint_name
                .clone()
                .unwrap_or_else(|| default_endpoint.to_string()),
            component: self.component.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub endpoint_name: String,
    pub first: StageConfig,
    pub second: StageConfig,
    #[serde(default)]
    pub second_prompt: PromptTemplate,
}

impl PipelineConfig {
    pub fn new(endpoint_name: impl Into<String>, first: StageConfig, second: StageConfig) -> Self {
        Self {
            endpoint_name: endpoint_name.into(),
            first,
            second,
            second_prompt: PromptTemplate::default(),
        }
    }

    pub fn with_second_prompt(mut self, template: PromptTemplate) -> Self {
        self.second_prompt = template;
        self
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DomainError::configuration(format!(
                "Failed to read pipeline config {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| {
            DomainError::configuration(format!("Invalid pipeline config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.endpoint_name.trim().is_empty() {
            return Err(DomainError::validation("Pipeline endpoint name is empty"));
        }

        Ok(())
    }
}
