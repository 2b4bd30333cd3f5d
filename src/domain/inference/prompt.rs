//! Instruction prompt formatting

use super::{ChatMessage, MessageRole};
use crate::domain::DomainError;

const BOS: &str = "<s>";
const EOS: &str = "</s>";
const INST_OPEN: &str = "[INST] ";
const INST_CLOSE: &str = " [/INST]";

/// Render a conversation with the Llama-2 instruction template
///
/// ```text
/// <s>[INST] <<SYS>>
/// {system}
/// <</SYS>>
///
/// {user} [/INST] {assistant} </s><s>[INST] {user} [/INST]
/// ```
///
/// System messages inside `turns` are appended to `system`.
pub fn format_instruction_prompt(
    system: Option<&str>,
    turns: &[ChatMessage],
) -> Result<String, DomainError> {
    let mut system_text = system.map(str::to_string).unwrap_or_default();

    for msg in turns.iter().filter(|m| m.role == MessageRole::System) {
        if !system_text.is_empty() {
            system_text.push('\n');
        }
        system_text.push_str(&msg.content);
    }

    let mut prompt = String::new();
    let mut seen_user = false;

    for msg in turns.iter().filter(|m| m.role != MessageRole::System) {
        match msg.role {
            MessageRole::User => {
                prompt.push_str(BOS);
                prompt.push_str(INST_OPEN);

                if !seen_user && !system_text.is_empty() {
                    prompt.push_str("<<SYS>>\n");
                    prompt.push_str(&system_text);
                    prompt.push_str("\n<</SYS>>\n\n");
                }

                prompt.push_str(msg.content.trim());
                prompt.push_str(INST_CLOSE);
                seen_user = true;
            }
            MessageRole::Assistant => {
                if !seen_user {
                    return Err(DomainError::validation(
                        "Conversation cannot start with an assistant turn",
                    ));
                }
                prompt.push(' ');
                prompt.push_str(msg.content.trim());
                prompt.push(' ');
                prompt.push_str(EOS);
            }
            MessageRole::System => {}
        }
    }

    if !seen_user {
        return Err(DomainError::validation("Conversation has no user turn"));
    }

    Ok(prompt)
}

/// Drop a prompt that the container echoed back in front of the generation
pub fn strip_prompt_echo<'a>(prompt: &str, generated: &'a str) -> &'a str {
    generated
        .strip_prefix(prompt)
        .map(str::trim_start)
        .unwrap_or(generated)
}
