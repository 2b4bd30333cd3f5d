//! Text-generation request/response schema

use serde::{Deserialize, Serialize};

/// Generation parameters understood by text-generation containers
///
/// Unset fields are left out of the payload so the container's own defaults
/// apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_new_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub do_sample: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_full_text: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<bool>,
}

impl GenerationParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_new_tokens(mut self, tokens: u32) -> Self {
        self.max_new_tokens = Some(tokens);
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_sampling(mut self, do_sample: bool) -> Self {
        self.do_sample = Some(do_sample);
        self
    }

    pub fn with_repetition_penalty(mut self, penalty: f32) -> Self {
        self.repetition_penalty = Some(penalty);
        self
    }

    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn with_return_full_text(mut self, full: bool) -> Self {
        self.return_full_text = Some(full);
        self
    }

    pub fn with_details(mut self, details: bool) -> Self {
        self.details = Some(details);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// `{"inputs": ..., "parameters": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextGenerationRequest {
    pub inputs: String,
    #[serde(default, skip_serializing_if = "GenerationParameters::is_empty")]
    pub parameters: GenerationParameters,
}

impl TextGenerationRequest {
    pub fn new(inputs: impl Into<String>) -> Self {
        Self {
            inputs: inputs.into(),
            parameters: GenerationParameters::default(),
        }
    }

    pub fn with_parameters(mut self, parameters: GenerationParameters) -> Self {
        self.parameters = parameters;
        self
    }
}

/// One generation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedText {
    pub generated_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Containers answer with either a list of results or a single object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextGenerationResponse {
    Many(Vec<GeneratedText>),
    One(GeneratedText),
}

impl TextGenerationResponse {
    /// Text of the first result
    pub fn first_text(&self) -> Option<&str> {
        match self {
            Self::Many(results) => results.first().map(|r| r.generated_text.as_str()),
            Self::One(result) => Some(result.generated_text.as_str()),
        }
    }
}
