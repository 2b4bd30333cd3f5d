//! SageMaker runtime client

use std::time::Instant;

use async_trait::async_trait;
use aws_smithy_types::Blob;
use tracing::debug;

use super::PROVIDER;
use crate::domain::endpoint::JSON_CONTENT_TYPE;
use crate::domain::{DomainError, EndpointInvoker, InvocationTarget};
use crate::infrastructure::aws::map_sdk_error;
use crate::infrastructure::observability::record_invocation;

/// Real SageMaker runtime client
#[derive(Debug, Clone)]
pub struct SageMakerInvoker {
    client: aws_sdk_sagemakerruntime::Client,
}

impl SageMakerInvoker {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_sagemakerruntime::Client::new(config),
        }
    }

    pub fn from_client(client: aws_sdk_sagemakerruntime::Client) -> Self {
        Self { client }
    }
}

fn response_body(body: Option<Blob>) -> Result<Vec<u8>, DomainError> {
    body.map(Blob::into_inner)
        .ok_or_else(|| DomainError::provider(PROVIDER, "InvokeEndpoint returned no body"))
}

#[async_trait]
impl EndpointInvoker for SageMakerInvoker {
    async fn invoke(
        &self,
        target: &InvocationTarget,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, DomainError> {
        debug!(target_model = %target, bytes = body.len(), "Invoking endpoint");
        let start = Instant::now();

        let result = self
            .client
            .invoke_endpoint()
            .endpoint_name(&target.endpoint)
            .set_inference_component_name(target.component.clone())
            .content_type(JSON_CONTENT_TYPE)
            .accept(JSON_CONTENT_TYPE)
            .body(Blob::new(body))
            .send()
            .await;

        record_invocation(target, result.is_ok(), start.elapsed());

        let output = result
            .map_err(|e| map_sdk_error(PROVIDER, "InvokeEndpoint", &target.to_string(), e))?;

        response_body(output.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_body() {
        let body = response_body(Some(Blob::new(br#"[{"generated_text":"hi"}]"#.to_vec()))).unwrap();
        assert_eq!(body, br#"[{"generated_text":"hi"}]"#.to_vec());
    }

    #[test]
    fn test_missing_body_is_provider_error() {
        let err = response_body(None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Provider error: sagemaker - InvokeEndpoint returned no body"
        );
    }
}
