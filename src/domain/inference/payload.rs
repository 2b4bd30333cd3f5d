//! Payload helpers for invoking and reading hosted models

use super::{
    ChatMessage, ChatRequest, ChatResponse, GenerationParameters, TextGenerationRequest,
    TextGenerationResponse,
};
use crate::domain::DomainError;

/// Serialize a text-generation request body
pub fn text_generation_payload(
    prompt: impl Into<String>,
    parameters: &GenerationParameters,
) -> Result<Vec<u8>, DomainError> {
    let request = TextGenerationRequest::new(prompt).with_parameters(parameters.clone());
    Ok(serde_json::to_vec(&request)?)
}

/// Serialize a chat request body, mapping generation parameters onto the
/// chat schema
pub fn chat_payload(
    messages: Vec<ChatMessage>,
    parameters: &GenerationParameters,
) -> Result<Vec<u8>, DomainError> {
    if messages.is_empty() {
        return Err(DomainError::validation("Chat request has no messages"));
    }

    let request = ChatRequest {
        messages,
        max_tokens: parameters.max_new_tokens,
        temperature: parameters.temperature,
        top_p: parameters.top_p,
        stop: parameters.stop.clone(),
    };

    Ok(serde_json::to_vec(&request)?)
}

/// Read the generated text out of a text-generation response body
pub fn extract_generated_text(body: &[u8]) -> Result<String, DomainError> {
    let response: TextGenerationResponse = serde_json::from_slice(body).map_err(|e| {
        DomainError::serialization(format!("Failed to parse generation response: {}", e))
    })?;

    response
        .first_text()
        .map(str::to_string)
        .ok_or_else(|| DomainError::serialization("Response is missing 'generated_text'"))
}

/// Read the first choice's content out of a chat response body
pub fn extract_chat_content(body: &[u8]) -> Result<String, DomainError> {
    let response: ChatResponse = serde_json::from_slice(body).map_err(|e| {
        DomainError::serialization(format!("Failed to parse chat response: {}", e))
    })?;

    response
        .content()
        .map(str::to_string)
        .ok_or_else(|| DomainError::serialization("Response is missing 'choices[0].message'"))
}
