//! Request/response payloads for hosted text-generation models

mod chat;
mod payload;
mod prompt;
mod text_generation;

pub use chat::{ChatChoice, ChatMessage, ChatRequest, ChatResponse, MessageRole};
pub use payload::{
    chat_payload, extract_chat_content, extract_generated_text, text_generation_payload,
};
pub use prompt::{format_instruction_prompt, strip_prompt_echo};
pub use text_generation::{
    GeneratedText, GenerationParameters, TextGenerationRequest, TextGenerationResponse,
};
