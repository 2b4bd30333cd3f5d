//! Call one hosted model, feed its output to a second one

use async_trait::async_trait;
use tracing::{debug, info};

use super::{InferenceHandler, PipelineConfig};
use crate::domain::{
    extract_generated_text, strip_prompt_echo, text_generation_payload, DomainError,
    EndpointInvoker, GeneratedText, InvocationTarget, TextGenerationRequest,
    TextGenerationResponse,
};

/// Sequential two-model pipeline
///
/// The request's `inputs` go to the first stage. The first stage's generated
/// text is rendered into the second-stage prompt template and sent to the
/// second stage, whose generated text is returned as
/// `{"generated_text": ...}`. A failing call ends the run with that call's
/// error; nothing is retried.
#[derive(Debug)]
pub struct TwoStagePipeline<I: EndpointInvoker> {
    invoker: I,
    config: PipelineConfig,
    first_target: InvocationTarget,
    second_target: InvocationTarget,
}

impl<I: EndpointInvoker> TwoStagePipeline<I> {
    pub fn new(invoker: I, config: PipelineConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let first_target = config.first.target(&config.endpoint_name);
        let second_target = config.second.target(&config.endpoint_name);

        Ok(Self {
            invoker,
            config,
            first_target,
            second_target,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run both stages on plain text input
    pub async fn run(&self, request: TextGenerationRequest) -> Result<String, DomainError> {
        let first_parameters = if request.parameters.is_empty() {
            &self.config.first.parameters
        } else {
            &request.parameters
        };

        let body = text_generation_payload(request.inputs.as_str(), first_parameters)?;
        info!(target_model = %self.first_target, "Invoking first stage");
        let response = self.invoker.invoke(&self.first_target, body).await?;

        let mut intermediate = extract_generated_text(&response)?;
        if first_parameters.return_full_text == Some(true) {
            intermediate = strip_prompt_echo(&request.inputs, &intermediate).to_string();
        }
        debug!(chars = intermediate.len(), "First stage output");

        let prompt = self.config.second_prompt.render(&intermediate);
        let second_parameters = &self.config.second.parameters;
        let body = text_generation_payload(prompt.as_str(), second_parameters)?;
        info!(target_model = %self.second_target, "Invoking second stage");
        let response = self.invoker.invoke(&self.second_target, body).await?;

        let output = extract_generated_text(&response)?;
        if second_parameters.return_full_text == Some(true) {
            return Ok(strip_prompt_echo(&prompt, &output).to_string());
        }

        Ok(output)
    }
}

#[async_trait]
impl<I: EndpointInvoker> InferenceHandler for TwoStagePipeline<I> {
    async fn handle(&self, body: Vec<u8>) -> Result<Vec<u8>, DomainError> {
        let request: TextGenerationRequest = serde_json::from_slice(&body)
            .map_err(|e| DomainError::validation(format!("Invalid request body: {}", e)))?;

        let generated_text = self.run(request).await?;

        let response = TextGenerationResponse::One(GeneratedText {
            generated_text,
            details: None,
        });

        Ok(serde_json::to_vec(&response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::endpoint::mock::MockEndpointInvoker;
    use crate::domain::pipeline::{PromptTemplate, StageConfig};
    use crate::domain::GenerationParameters;
    use serde_json::json;

    fn first() -> InvocationTarget {
        InvocationTarget::component("shared-ep", "ic-draft")
    }

    fn second() -> InvocationTarget {
        InvocationTarget::component("shared-ep", "ic-polish")
    }

    fn config() -> PipelineConfig {
        PipelineConfig::new(
            "shared-ep",
            StageConfig::component("ic-draft")
                .with_parameters(GenerationParameters::new().with_max_new_tokens(64)),
            StageConfig::component("ic-polish")
                .with_parameters(GenerationParameters::new().with_temperature(0.2)),
        )
        .with_second_prompt(PromptTemplate::new("Polish: {text}").unwrap())
    }

    #[tokio::test]
    async fn test_chains_first_output_into_second_input() {
        let invoker = MockEndpointInvoker::new()
            .with_response(first(), json!([{"generated_text": "rough draft"}]))
            .with_response(second(), json!([{"generated_text": "final text"}]));
        let pipeline = TwoStagePipeline::new(invoker, config()).unwrap();

        let body = serde_json::to_vec(&json!({"inputs": "Write a haiku"})).unwrap();
        let response = pipeline.handle(body).await.unwrap();

        let json: serde_json::Value = serde_json::from_slice(&response).unwrap();
        assert_eq!(json, json!({"generated_text": "final text"}));

        let calls = pipeline.invoker.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, first());
        assert_eq!(calls[0].1["inputs"], "Write a haiku");
        assert_eq!(calls[0].1["parameters"]["max_new_tokens"], 64);
        assert_eq!(calls[1].0, second());
        assert_eq!(calls[1].1["inputs"], "Polish: rough draft");
        assert_eq!(calls[1].1["parameters"]["temperature"], 0.2);
    }

    #[tokio::test]
    async fn test_request_parameters_override_first_stage() {
        let invoker = MockEndpointInvoker::new()
            .with_response(first(), json!({"generated_text": "a"}))
            .with_response(second(), json!({"generated_text": "b"}));
        let pipeline = TwoStagePipeline::new(invoker, config()).unwrap();

        let body = serde_json::to_vec(&json!({
            "inputs": "x",
            "parameters": {"max_new_tokens": 8}
        }))
        .unwrap();
        pipeline.handle(body).await.unwrap();

        let calls = pipeline.invoker.calls();
        assert_eq!(calls[0].1["parameters"], json!({"max_new_tokens": 8}));
    }

    #[tokio::test]
    async fn test_first_stage_failure_skips_second() {
        let invoker = MockEndpointInvoker::new()
            .with_error(first(), "ModelError: CUDA OOM")
            .with_response(second(), json!([{"generated_text": "unreachable"}]));
        let pipeline = TwoStagePipeline::new(invoker, config()).unwrap();

        let body = serde_json::to_vec(&json!({"inputs": "hi"})).unwrap();
        let err = pipeline.handle(body).await.unwrap_err();

        assert!(err.to_string().contains("CUDA OOM"));
        assert_eq!(pipeline.invoker.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_second_stage_failure_propagates() {
        let invoker = MockEndpointInvoker::new()
            .with_response(first(), json!([{"generated_text": "draft"}]))
            .with_error(second(), "ThrottlingException");
        let pipeline = TwoStagePipeline::new(invoker, config()).unwrap();

        let body = serde_json::to_vec(&json!({"inputs": "hi"})).unwrap();
        let err = pipeline.handle(body).await.unwrap_err();

        assert!(matches!(err, DomainError::Provider { .. }));
        assert_eq!(pipeline.invoker.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_first_response() {
        let invoker = MockEndpointInvoker::new()
            .with_raw_response(first(), b"[]")
            .with_response(second(), json!([{"generated_text": "unreachable"}]));
        let pipeline = TwoStagePipeline::new(invoker, config()).unwrap();

        let body = serde_json::to_vec(&json!({"inputs": "hi"})).unwrap();
        let err = pipeline.handle(body).await.unwrap_err();

        assert!(matches!(err, DomainError::Serialization { .. }));
        assert_eq!(pipeline.invoker.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_request_body() {
        let pipeline = TwoStagePipeline::new(MockEndpointInvoker::new(), config()).unwrap();

        let err = pipeline.handle(b"{\"prompt\": 1}".to_vec()).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(pipeline.invoker.calls().is_empty());
    }

    #[tokio::test]
    async fn test_strips_echoed_prompt_when_full_text_returned() {
        let mut config = config();
        config.first.parameters = GenerationParameters::new().with_return_full_text(true);

        let invoker = MockEndpointInvoker::new()
            .with_response(first(), json!([{"generated_text": "Question? Answer."}]))
            .with_response(second(), json!([{"generated_text": "done"}]));
        let pipeline = TwoStagePipeline::new(invoker, config).unwrap();

        let request = TextGenerationRequest::new("Question?");
        assert_eq!(pipeline.run(request).await.unwrap(), "done");
        assert_eq!(pipeline.invoker.calls()[1].1["inputs"], "Polish: Answer.");
    }

    #[tokio::test]
    async fn test_separate_endpoints() {
        let config = PipelineConfig::new(
            "ep-a",
            StageConfig::default(),
            StageConfig::default().with_endpoint("ep-b"),
        );
        let invoker = MockEndpointInvoker::new()
            .with_response(InvocationTarget::endpoint("ep-a"), json!([{"generated_text": "1"}]))
            .with_response(InvocationTarget::endpoint("ep-b"), json!([{"generated_text": "2"}]));
        let pipeline = TwoStagePipeline::new(invoker, config).unwrap();

        let output = pipeline.run(TextGenerationRequest::new("0")).await.unwrap();
        assert_eq!(output, "2");
        assert_eq!(pipeline.invoker.calls()[1].1["inputs"], "1");
    }
}
