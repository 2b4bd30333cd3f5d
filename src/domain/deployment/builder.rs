//! Builder mapping a model reference and a resource request to a plan

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{
    DeploymentPlan, EndpointConfigSpec, EndpointSpec, InferenceComponentSpec, InstanceScaling,
    ModelSpec,
};
use crate::domain::{
    container_environment, ContainerImage, DomainError, ModelReference, ResourceName,
    ResourceRequest, ResourceValidationError, ServingOptions,
};

/// Production variant every plan uses
pub const DEFAULT_VARIANT_NAME: &str = "AllTraffic";

/// Large models need more than the service default to download
pub const DEFAULT_MODEL_DATA_DOWNLOAD_TIMEOUT_SECS: u32 = 3600;

pub const DEFAULT_CONTAINER_STARTUP_TIMEOUT_SECS: u32 = 3600;

/// Builds a [`DeploymentPlan`]
///
/// ```ignore
/// let plan = DeploymentBuilder::new("llama-2-7b", ModelReference::hub("meta-llama/Llama-2-7b-chat-hf"))
///     .instance_type("ml.g5.2xlarge")
///     .resources(ResourceRequest::new(20480).with_accelerators(1))
///     .execution_role("arn:aws:iam::123456789012:role/SageMakerRole")
///     .region("us-east-1")
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct DeploymentBuilder {
    name_base: String,
    model: ModelReference,
    container: ContainerImage,
    resources: ResourceRequest,
    serving: ServingOptions,
    instance_type: Option<String>,
    initial_instance_count: u32,
    instance_scaling: Option<InstanceScaling>,
    execution_role: Option<String>,
    region: Option<String>,
    model_data_download_timeout_secs: u32,
    container_startup_timeout_secs: u32,
    created_at: Option<DateTime<Utc>>,
}

impl DeploymentBuilder {
    /// Start a plan; an empty `name_base` falls back to the model's slug
    pub fn new(name_base: impl Into<String>, model: ModelReference) -> Self {
        Self {
            name_base: name_base.into(),
            model,
            container: ContainerImage::default(),
            resources: ResourceRequest::new(1024),
            serving: ServingOptions::default(),
            instance_type: None,
            initial_instance_count: 1,
            instance_scaling: None,
            execution_role: None,
            region: None,
            model_data_download_timeout_secs: DEFAULT_MODEL_DATA_DOWNLOAD_TIMEOUT_SECS,
            container_startup_timeout_secs: DEFAULT_CONTAINER_STARTUP_TIMEOUT_SECS,
            created_at: None,
        }
    }

    pub fn container(mut self, container: ContainerImage) -> Self {
        self.container = container;
        self
    }

    pub fn resources(mut self, resources: ResourceRequest) -> Self {
        self.resources = resources;
        self
    }

    pub fn serving(mut self, serving: ServingOptions) -> Self {
        self.serving = serving;
        self
    }

    pub fn instance_type(mut self, instance_type: impl Into<String>) -> Self {
        self.instance_type = Some(instance_type.into());
        self
    }

    pub fn initial_instance_count(mut self, count: u32) -> Self {
        self.initial_instance_count = count;
        self
    }

    pub fn instance_scaling(mut self, min: u32, max: u32) -> Self {
        self.instance_scaling = Some(InstanceScaling {
            min_instance_count: min,
            max_instance_count: max,
        });
        self
    }

    pub fn execution_role(mut self, role_arn: impl Into<String>) -> Self {
        self.execution_role = Some(role_arn.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn model_data_download_timeout_secs(mut self, secs: u32) -> Self {
        self.model_data_download_timeout_secs = secs;
        self
    }

    pub fn container_startup_timeout_secs(mut self, secs: u32) -> Self {
        self.container_startup_timeout_secs = secs;
        self
    }

    /// Pin the timestamp used for unique names
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn build(self) -> Result<DeploymentPlan, DomainError> {
        let execution_role = self
            .execution_role
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| DomainError::configuration("An execution role ARN is required"))?;

        let instance_type = self
            .instance_type
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| DomainError::configuration("An instance type is required"))?;

        if self.initial_instance_count == 0 {
            return Err(ResourceValidationError::InvalidInstanceCount.into());
        }

        if let Some(scaling) = self.instance_scaling {
            if scaling.min_instance_count > scaling.max_instance_count {
                return Err(DomainError::validation(format!(
                    "Instance scaling min {} exceeds max {}",
                    scaling.min_instance_count, scaling.max_instance_count
                )));
            }
        }

        self.resources.validate()?;

        let image = self.container.resolve(self.region.as_deref())?;
        let environment =
            container_environment(&self.container, &self.model, &self.serving, &self.resources);

        let base = if self.name_base.trim().is_empty() {
            self.model.slug()
        } else {
            self.name_base.clone()
        };
        let at = self.created_at.unwrap_or_else(Utc::now);

        let model_name = ResourceName::unique_at(&base, at)?;
        let config_name = ResourceName::unique_at(&format!("{}-config", base), at)?;
        let endpoint_name = ResourceName::unique_at(&format!("{}-endpoint", base), at)?;
        let component_name = ResourceName::unique_at(&format!("{}-ic", base), at)?;

        debug!(
            model = %model_name,
            endpoint = %endpoint_name,
            image = %image,
            "Built deployment plan"
        );

        Ok(DeploymentPlan {
            model: ModelSpec {
                name: model_name.clone(),
                image,
                environment,
                execution_role_arn: execution_role.clone(),
                model_data_url: self.model.model_data_url().map(str::to_string),
            },
            endpoint_config: EndpointConfigSpec {
                name: config_name.clone(),
                variant_name: DEFAULT_VARIANT_NAME.to_string(),
                instance_type,
                initial_instance_count: self.initial_instance_count,
                execution_role_arn: execution_role,
                model_data_download_timeout_secs: self.model_data_download_timeout_secs,
                container_startup_timeout_secs: self.container_startup_timeout_secs,
                instance_scaling: self.instance_scaling,
            },
            endpoint: EndpointSpec {
                name: endpoint_name.clone(),
                endpoint_config_name: config_name,
            },
            inference_component: InferenceComponentSpec {
                name: component_name,
                endpoint_name,
                variant_name: DEFAULT_VARIANT_NAME.to_string(),
                model_name,
                resources: self.resources,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ROLE: &str = "arn:aws:iam::123456789012:role/SageMakerRole";

    fn builder() -> DeploymentBuilder {
        DeploymentBuilder::new("llama-2-7b", ModelReference::hub("meta-llama/Llama-2-7b-chat-hf"))
            .instance_type("ml.g5.12xlarge")
            .resources(ResourceRequest::new(20480).with_accelerators(2).with_copies(2))
            .execution_role(ROLE)
            .region("us-west-2")
            .created_at(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
    }

    #[test]
    fn test_build_plan() {
        let plan = builder().build().unwrap();

        assert_eq!(plan.model.name.as_str(), "llama-2-7b-2024-01-02-03-04-05-000");
        assert!(plan.model.image.contains("us-west-2"));
        assert_eq!(plan.model.environment["SM_NUM_GPUS"], "2");
        assert_eq!(plan.model.execution_role_arn, ROLE);
        assert_eq!(plan.model.model_data_url, None);

        assert_eq!(
            plan.endpoint_config.name.as_str(),
            "llama-2-7b-config-2024-01-02-03-04-05-000"
        );
        assert_eq!(plan.endpoint_config.variant_name, "AllTraffic");
        assert_eq!(plan.endpoint_config.instance_type, "ml.g5.12xlarge");
        assert_eq!(plan.endpoint_config.initial_instance_count, 1);

        assert_eq!(plan.endpoint.endpoint_config_name, plan.endpoint_config.name);
        assert_eq!(plan.inference_component.endpoint_name, plan.endpoint.name);
        assert_eq!(plan.inference_component.model_name, plan.model.name);
        assert_eq!(plan.inference_component.resources.copy_count, 2);
    }

    #[test]
    fn test_missing_role() {
        let result = DeploymentBuilder::new("m", ModelReference::hub("gpt2"))
            .instance_type("ml.m5.xlarge")
            .region("us-east-1")
            .build();
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_missing_instance_type() {
        let result = DeploymentBuilder::new("m", ModelReference::hub("gpt2"))
            .execution_role(ROLE)
            .region("us-east-1")
            .build();
        assert!(result.unwrap_err().to_string().contains("instance type"));
    }

    #[test]
    fn test_missing_region_for_framework_container() {
        let result = DeploymentBuilder::new("m", ModelReference::hub("gpt2"))
            .instance_type("ml.m5.xlarge")
            .execution_role(ROLE)
            .build();
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_invalid_resources() {
        let result = builder().resources(ResourceRequest::new(0)).build();
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[test]
    fn test_invalid_instance_scaling() {
        let result = builder().instance_scaling(3, 1).build();
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        let plan = builder().instance_scaling(1, 4).build().unwrap();
        assert_eq!(
            plan.endpoint_config.instance_scaling,
            Some(InstanceScaling {
                min_instance_count: 1,
                max_instance_count: 4
            })
        );
    }

    #[test]
    fn test_empty_base_uses_model_slug() {
        let plan = DeploymentBuilder::new("", ModelReference::artifact("s3://b/falcon_40b.tar.gz"))
            .container(ContainerImage::uri("123.dkr.ecr.us-east-1.amazonaws.com/custom:1"))
            .instance_type("ml.g5.48xlarge")
            .execution_role(ROLE)
            .created_at(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
            .build()
            .unwrap();

        assert!(plan.model.name.as_str().starts_with("falcon-40b-2024"));
        assert_eq!(
            plan.model.model_data_url.as_deref(),
            Some("s3://b/falcon_40b.tar.gz")
        );
        assert_eq!(plan.model.environment["HF_MODEL_ID"], "/opt/ml/model");
    }
}
