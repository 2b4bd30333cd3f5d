//! Serving container selection and container environment

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ModelReference;
use crate::domain::{DomainError, ResourceRequest};

/// Default text-generation-inference image tag
pub const DEFAULT_TGI_VERSION: &str = "2.1.1-tgi1.4.0-gpu-py310-cu121-ubuntu22.04";

/// Default large-model-inference image tag
pub const DEFAULT_DJL_VERSION: &str = "0.26.0-deepspeed0.12.6-cu121";

/// Registry account hosting the deep learning containers in most regions
const DEFAULT_REGISTRY_ACCOUNT: &str = "763104351884";

/// Regions whose containers live in a different registry account
const REGIONAL_REGISTRY_ACCOUNTS: &[(&str, &str)] = &[
    ("af-south-1", "626614931356"),
    ("ap-east-1", "871362719292"),
    ("eu-south-1", "692866216735"),
    ("me-south-1", "217643126080"),
    ("cn-north-1", "727897471807"),
    ("cn-northwest-1", "727897471807"),
];

/// The container image that serves the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContainerImage {
    /// A fully qualified image URI
    Uri { uri: String },
    /// Hugging Face text-generation-inference
    Tgi { version: String },
    /// DJL large model inference
    Djl { version: String },
}

impl Default for ContainerImage {
    fn default() -> Self {
        Self::Tgi {
            version: DEFAULT_TGI_VERSION.to_string(),
        }
    }
}

impl ContainerImage {
    pub fn uri(uri: impl Into<String>) -> Self {
        Self::Uri { uri: uri.into() }
    }

    pub fn tgi() -> Self {
        Self::default()
    }

    pub fn djl() -> Self {
        Self::Djl {
            version: DEFAULT_DJL_VERSION.to_string(),
        }
    }

    /// Resolve to an image URI for the given region
    pub fn resolve(&self, region: Option<&str>) -> Result<String, DomainError> {
        let (repository, version) = match self {
            Self::Uri { uri } => {
                if uri.trim().is_empty() {
                    return Err(DomainError::configuration("Container image URI is empty"));
                }
                return Ok(uri.clone());
            }
            Self::Tgi { version } => ("huggingface-pytorch-tgi-inference", version),
            Self::Djl { version } => ("djl-inference", version),
        };

        let region = region.ok_or_else(|| {
            DomainError::configuration(format!(
                "A region is required to resolve the {} container",
                repository
            ))
        })?;

        let account = REGIONAL_REGISTRY_ACCOUNTS
            .iter()
            .find(|(r, _)| *r == region)
            .map(|(_, account)| *account)
            .unwrap_or(DEFAULT_REGISTRY_ACCOUNT);

        let domain = if region.starts_with("cn-") {
            "amazonaws.com.cn"
        } else {
            "amazonaws.com"
        };

        Ok(format!(
            "{}.dkr.ecr.{}.{}/{}:{}",
            account, region, domain, repository, version
        ))
    }
}

/// Token limits and credentials passed to the serving container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServingOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_input_length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_total_tokens: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_batch_prefill_tokens: Option<u32>,

    /// Token for gated hub models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_token: Option<String>,

    /// Extra variables copied into the environment verbatim
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_env: BTreeMap<String, String>,
}

impl ServingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_input_length(mut self, tokens: u32) -> Self {
        self.max_input_length = Some(tokens);
        self
    }

    pub fn with_max_total_tokens(mut self, tokens: u32) -> Self {
        self.max_total_tokens = Some(tokens);
        self
    }

    pub fn with_max_batch_prefill_tokens(mut self, tokens: u32) -> Self {
        self.max_batch_prefill_tokens = Some(tokens);
        self
    }

    pub fn with_hub_token(mut self, token: impl Into<String>) -> Self {
        self.hub_token = Some(token.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_env.insert(key.into(), value.into());
        self
    }
}

/// Build the environment the serving container starts with
pub fn container_environment(
    container: &ContainerImage,
    model: &ModelReference,
    options: &ServingOptions,
    resources: &ResourceRequest,
) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();

    env.insert("HF_MODEL_ID".to_string(), model.container_model_id().to_string());

    if let ModelReference::Hub {
        revision: Some(revision),
        ..
    } = model
    {
        env.insert("HF_MODEL_REVISION".to_string(), revision.clone());
    }

    let accelerators = resources.accelerators();

    match container {
        ContainerImage::Djl { .. } => {
            if accelerators > 0 {
                env.insert("TENSOR_PARALLEL_DEGREE".to_string(), accelerators.to_string());
            }
            if let Some(total) = options.max_total_tokens {
                env.insert("OPTION_MAX_MODEL_LEN".to_string(), total.to_string());
            }
        }
        ContainerImage::Tgi { .. } | ContainerImage::Uri { .. } => {
            if accelerators > 0 {
                env.insert("SM_NUM_GPUS".to_string(), accelerators.to_string());
            }
            if let Some(input) = options.max_input_length {
                env.insert("MAX_INPUT_LENGTH".to_string(), input.to_string());
            }
            if let Some(total) = options.max_total_tokens {
                env.insert("MAX_TOTAL_TOKENS".to_string(), total.to_string());
            }
            if let Some(prefill) = options.max_batch_prefill_tokens {
                env.insert("MAX_BATCH_PREFILL_TOKENS".to_string(), prefill.to_string());
            }
        }
    }

    if let Some(ref token) = options.hub_token {
        env.insert("HUGGING_FACE_HUB_TOKEN".to_string(), token.clone());
    }

    for (key, value) in &options.extra_env {
        env.insert(key.clone(), value.clone());
    }

    env
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_tgi_default_region() {
        let uri = ContainerImage::tgi().resolve(Some("us-east-1")).unwrap();
        assert_eq!(
            uri,
            format!(
                "763104351884.dkr.ecr.us-east-1.amazonaws.com/huggingface-pytorch-tgi-inference:{}",
                DEFAULT_TGI_VERSION
            )
        );
    }

    #[test]
    fn test_resolve_regional_account_and_china_domain() {
        let uri = ContainerImage::djl().resolve(Some("cn-north-1")).unwrap();
        assert!(uri.starts_with("727897471807.dkr.ecr.cn-north-1.amazonaws.com.cn/djl-inference:"));

        let uri = ContainerImage::tgi().resolve(Some("ap-east-1")).unwrap();
        assert!(uri.starts_with("871362719292."));
    }

    #[test]
    fn test_resolve_requires_region_for_framework() {
        let result = ContainerImage::tgi().resolve(None);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_explicit_uri_passes_through() {
        let image = ContainerImage::uri("123.dkr.ecr.eu-west-1.amazonaws.com/custom:latest");
        assert_eq!(
            image.resolve(None).unwrap(),
            "123.dkr.ecr.eu-west-1.amazonaws.com/custom:latest"
        );
        assert!(ContainerImage::uri("  ").resolve(None).is_err());
    }

    #[test]
    fn test_tgi_environment() {
        let model = ModelReference::hub_revision("meta-llama/Llama-2-7b-chat-hf", "main");
        let options = ServingOptions::new()
            .with_max_input_length(2048)
            .with_max_total_tokens(4096)
            .with_hub_token("hf_secret");
        let resources = ResourceRequest::new(20480).with_accelerators(4);

        let env = container_environment(&ContainerImage::tgi(), &model, &options, &resources);

        assert_eq!(env["HF_MODEL_ID"], "meta-llama/Llama-2-7b-chat-hf");
        assert_eq!(env["HF_MODEL_REVISION"], "main");
        assert_eq!(env["SM_NUM_GPUS"], "4");
        assert_eq!(env["MAX_INPUT_LENGTH"], "2048");
        assert_eq!(env["MAX_TOTAL_TOKENS"], "4096");
        assert_eq!(env["HUGGING_FACE_HUB_TOKEN"], "hf_secret");
        assert!(!env.contains_key("MAX_BATCH_PREFILL_TOKENS"));
    }

    #[test]
    fn test_djl_environment_for_artifact() {
        let model = ModelReference::artifact("s3://bucket/model.tar.gz");
        let options = ServingOptions::new()
            .with_max_total_tokens(8192)
            .with_env("OPTION_ROLLING_BATCH", "vllm");
        let resources = ResourceRequest::new(40960).with_accelerators(2);

        let env = container_environment(&ContainerImage::djl(), &model, &options, &resources);

        assert_eq!(env["HF_MODEL_ID"], "/opt/ml/model");
        assert_eq!(env["TENSOR_PARALLEL_DEGREE"], "2");
        assert_eq!(env["OPTION_MAX_MODEL_LEN"], "8192");
        assert_eq!(env["OPTION_ROLLING_BATCH"], "vllm");
        assert!(!env.contains_key("SM_NUM_GPUS"));
    }

    #[test]
    fn test_cpu_only_has_no_gpu_count() {
        let env = container_environment(
            &ContainerImage::tgi(),
            &ModelReference::hub("gpt2"),
            &ServingOptions::default(),
            &ResourceRequest::new(2048).with_cpus(2.0),
        );
        assert!(!env.contains_key("SM_NUM_GPUS"));
    }
}
