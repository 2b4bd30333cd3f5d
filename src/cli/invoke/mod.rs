//! Invoke command - send one prompt to a hosted model

use clap::Args;

use super::Context;
use crate::domain::{
    chat_payload, extract_chat_content, extract_generated_text, format_instruction_prompt,
    text_generation_payload, ChatMessage, EndpointInvoker, GenerationParameters,
    InvocationTarget,
};
use crate::infrastructure::sagemaker::SageMakerInvoker;

#[derive(Args, Clone)]
pub struct InvokeArgs {
    #[arg(long)]
    pub endpoint: String,

    /// Inference component on the endpoint
    #[arg(long)]
    pub component: Option<String>,

    /// User prompt
    #[arg(long)]
    pub prompt: String,

    /// System prompt
    #[arg(long)]
    pub system: Option<String>,

    /// Use the chat messages schema instead of text generation
    #[arg(long)]
    pub chat: bool,

    /// Wrap the prompt in the instruction template before sending
    #[arg(long, conflicts_with = "chat")]
    pub instruct: bool,

    #[arg(long, default_value_t = 256)]
    pub max_new_tokens: u32,

    #[arg(long)]
    pub temperature: Option<f32>,

    #[arg(long)]
    pub top_p: Option<f32>,

    /// Stop sequence; repeat for several
    #[arg(long)]
    pub stop: Vec<String>,
}

impl InvokeArgs {
    fn parameters(&self) -> GenerationParameters {
        let mut params = GenerationParameters::new().with_max_new_tokens(self.max_new_tokens);
        if let Some(temperature) = self.temperature {
            params = params.with_temperature(temperature).with_sampling(true);
        }
        if let Some(top_p) = self.top_p {
            params = params.with_top_p(top_p);
        }
        if !self.stop.is_empty() {
            params = params.with_stop(self.stop.clone());
        }
        params
    }

    fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::new();
        if let Some(system) = &self.system {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(&self.prompt));
        messages
    }

    fn target(&self) -> InvocationTarget {
        InvocationTarget {
            endpoint: self.endpoint.clone(),
            component: self.component.clone(),
        }
    }
}

pub async fn run(args: InvokeArgs) -> anyhow::Result<()> {
    let ctx = Context::load().await;
    let invoker = SageMakerInvoker::new(&ctx.sdk);
    let params = args.parameters();

    let text = if args.chat {
        let body = chat_payload(args.messages(), &params)?;
        let response = invoker.invoke(&args.target(), body).await?;
        extract_chat_content(&response)?
    } else {
        let prompt = if args.instruct {
            format_instruction_prompt(args.system.as_deref(), &[ChatMessage::user(&args.prompt)])?
        } else {
            args.prompt.clone()
        };
        let body = text_generation_payload(prompt, &params)?;
        let response = invoker.invoke(&args.target(), body).await?;
        extract_generated_text(&response)?
    };

    println!("{}", text);
    Ok(())
}
