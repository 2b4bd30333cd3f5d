//! SageMaker control-plane client

use async_trait::async_trait;
use aws_sdk_sagemaker::types::{
    ContainerDefinition, InferenceComponentComputeResourceRequirements,
    InferenceComponentRuntimeConfig, InferenceComponentSpecification,
    ManagedInstanceScalingStatus, ProductionVariant, ProductionVariantInstanceType,
    ProductionVariantManagedInstanceScaling,
};
use tracing::info;

use super::PROVIDER;
use crate::domain::{
    DomainError, EndpointConfigSpec, EndpointControl, EndpointSpec, EndpointStatus,
    InferenceComponentSpec, ModelSpec,
};
use crate::infrastructure::aws::map_sdk_error;

/// Real SageMaker control-plane client
#[derive(Debug, Clone)]
pub struct SageMakerControl {
    client: aws_sdk_sagemaker::Client,
}

impl SageMakerControl {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_sagemaker::Client::new(config),
        }
    }

    pub fn from_client(client: aws_sdk_sagemaker::Client) -> Self {
        Self { client }
    }
}

fn to_i32(value: u32, field: &str) -> Result<i32, DomainError> {
    i32::try_from(value)
        .map_err(|_| DomainError::validation(format!("{} {} is too large", field, value)))
}

fn container_definition(spec: &ModelSpec) -> ContainerDefinition {
    ContainerDefinition::builder()
        .image(&spec.image)
        .set_environment(Some(
            spec.environment
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ))
        .set_model_data_url(spec.model_data_url.clone())
        .build()
}

fn production_variant(spec: &EndpointConfigSpec) -> Result<ProductionVariant, DomainError> {
    let scaling = match spec.instance_scaling {
        Some(scaling) => Some(
            ProductionVariantManagedInstanceScaling::builder()
                .status(ManagedInstanceScalingStatus::Enabled)
                .min_instance_count(to_i32(scaling.min_instance_count, "min_instance_count")?)
                .max_instance_count(to_i32(scaling.max_instance_count, "max_instance_count")?)
                .build(),
        ),
        None => None,
    };

    Ok(ProductionVariant::builder()
        .variant_name(&spec.variant_name)
        .instance_type(ProductionVariantInstanceType::from(spec.instance_type.as_str()))
        .initial_instance_count(to_i32(spec.initial_instance_count, "initial_instance_count")?)
        .model_data_download_timeout_in_seconds(to_i32(
            spec.model_data_download_timeout_secs,
            "model_data_download_timeout_secs",
        )?)
        .container_startup_health_check_timeout_in_seconds(to_i32(
            spec.container_startup_timeout_secs,
            "container_startup_timeout_secs",
        )?)
        .set_managed_instance_scaling(scaling)
        .build())
}

fn runtime_config(copies: u32) -> Result<InferenceComponentRuntimeConfig, DomainError> {
    Ok(InferenceComponentRuntimeConfig::builder()
        .copy_count(to_i32(copies, "copy_count")?)
        .build())
}

fn component_specification(
    spec: &InferenceComponentSpec,
) -> Result<InferenceComponentSpecification, DomainError> {
    let resources = &spec.resources;

    let requirements = InferenceComponentComputeResourceRequirements::builder()
        .min_memory_required_in_mb(to_i32(resources.min_memory_mb, "min_memory_mb")?)
        .set_number_of_accelerator_devices_required(resources.accelerator_count.map(|n| n as f32))
        .set_number_of_cpu_cores_required(resources.cpu_count)
        .build();

    Ok(InferenceComponentSpecification::builder()
        .model_name(spec.model_name.as_str())
        .compute_resource_requirements(requirements)
        .build())
}

#[async_trait]
impl EndpointControl for SageMakerControl {
    async fn create_model(&self, spec: &ModelSpec) -> Result<(), DomainError> {
        info!(model = %spec.name, image = %spec.image, "Creating model");

        self.client
            .create_model()
            .model_name(spec.name.as_str())
            .execution_role_arn(&spec.execution_role_arn)
            .primary_container(container_definition(spec))
            .send()
            .await
            .map_err(|e| map_sdk_error(PROVIDER, "CreateModel", spec.name.as_str(), e))?;

        Ok(())
    }

    async fn create_endpoint_config(&self, spec: &EndpointConfigSpec) -> Result<(), DomainError> {
        info!(
            endpoint_config = %spec.name,
            instance_type = %spec.instance_type,
            instances = spec.initial_instance_count,
            "Creating endpoint config"
        );

        self.client
            .create_endpoint_config()
            .endpoint_config_name(spec.name.as_str())
            .execution_role_arn(&spec.execution_role_arn)
            .production_variants(production_variant(spec)?)
            .send()
            .await
            .map_err(|e| {
                map_sdk_error(PROVIDER, "CreateEndpointConfig", spec.name.as_str(), e)
            })?;

        Ok(())
    }

    async fn create_endpoint(&self, spec: &EndpointSpec) -> Result<(), DomainError> {
        info!(endpoint = %spec.name, config = %spec.endpoint_config_name, "Creating endpoint");

        self.client
            .create_endpoint()
            .endpoint_name(spec.name.as_str())
            .endpoint_config_name(spec.endpoint_config_name.as_str())
            .send()
            .await
            .map_err(|e| map_sdk_error(PROVIDER, "CreateEndpoint", spec.name.as_str(), e))?;

        Ok(())
    }

    async fn describe_endpoint(&self, name: &str) -> Result<EndpointStatus, DomainError> {
        let output = self
            .client
            .describe_endpoint()
            .endpoint_name(name)
            .send()
            .await
            .map_err(|e| map_sdk_error(PROVIDER, "DescribeEndpoint", name, e))?;

        let status = output
            .endpoint_status()
            .map(|s| s.as_str())
            .unwrap_or("Unknown");

        Ok(EndpointStatus::from_service(status, output.failure_reason()))
    }

    async fn create_inference_component(
        &self,
        spec: &InferenceComponentSpec,
    ) -> Result<(), DomainError> {
        info!(
            component = %spec.name,
            endpoint = %spec.endpoint_name,
            copies = spec.resources.copy_count,
            "Creating inference component"
        );

        self.client
            .create_inference_component()
            .inference_component_name(spec.name.as_str())
            .endpoint_name(spec.endpoint_name.as_str())
            .variant_name(&spec.variant_name)
            .specification(component_specification(spec)?)
            .runtime_config(runtime_config(spec.resources.copy_count)?)
            .send()
            .await
            .map_err(|e| {
                map_sdk_error(PROVIDER, "CreateInferenceComponent", spec.name.as_str(), e)
            })?;

        Ok(())
    }

    async fn describe_inference_component(
        &self,
        name: &str,
    ) -> Result<EndpointStatus, DomainError> {
        let output = self
            .client
            .describe_inference_component()
            .inference_component_name(name)
            .send()
            .await
            .map_err(|e| map_sdk_error(PROVIDER, "DescribeInferenceComponent", name, e))?;

        let status = output
            .inference_component_status()
            .map(|s| s.as_str())
            .unwrap_or("Unknown");

        Ok(EndpointStatus::from_service(status, output.failure_reason()))
    }

    async fn update_copy_count(&self, component: &str, copies: u32) -> Result<(), DomainError> {
        info!(component = %component, copies, "Updating copy count");

        self.client
            .update_inference_component_runtime_config()
            .inference_component_name(component)
            .desired_runtime_config(runtime_config(copies)?)
            .send()
            .await
            .map_err(|e| {
                map_sdk_error(
                    PROVIDER,
                    "UpdateInferenceComponentRuntimeConfig",
                    component,
                    e,
                )
            })?;

        Ok(())
    }

    async fn delete_inference_component(&self, name: &str) -> Result<(), DomainError> {
        info!(component = %name, "Deleting inference component");

        self.client
            .delete_inference_component()
            .inference_component_name(name)
            .send()
            .await
            .map_err(|e| map_sdk_error(PROVIDER, "DeleteInferenceComponent", name, e))?;

        Ok(())
    }

    async fn delete_endpoint(&self, name: &str) -> Result<(), DomainError> {
        info!(endpoint = %name, "Deleting endpoint");

        self.client
            .delete_endpoint()
            .endpoint_name(name)
            .send()
            .await
            .map_err(|e| map_sdk_error(PROVIDER, "DeleteEndpoint", name, e))?;

        Ok(())
    }

    async fn delete_endpoint_config(&self, name: &str) -> Result<(), DomainError> {
        info!(endpoint_config = %name, "Deleting endpoint config");

        self.client
            .delete_endpoint_config()
            .endpoint_config_name(name)
            .send()
            .await
            .map_err(|e| map_sdk_error(PROVIDER, "DeleteEndpointConfig", name, e))?;

        Ok(())
    }

    async fn delete_model(&self, name: &str) -> Result<(), DomainError> {
        info!(model = %name, "Deleting model");

        self.client
            .delete_model()
            .model_name(name)
            .send()
            .await
            .map_err(|e| map_sdk_error(PROVIDER, "DeleteModel", name, e))?;

        Ok(())
    }
}
