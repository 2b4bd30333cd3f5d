//! Resource specifications handed to the service as-is

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{ResourceName, ResourceRequest};

/// A registered model: serving image plus its environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: ResourceName,
    pub image: String,
    pub environment: BTreeMap<String, String>,
    pub execution_role_arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_data_url: Option<String>,
}

/// Managed scaling bounds for the instance fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceScaling {
    pub min_instance_count: u32,
    pub max_instance_count: u32,
}

/// The instance fleet behind an endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfigSpec {
    pub name: ResourceName,
    pub variant_name: String,
    pub instance_type: String,
    pub initial_instance_count: u32,
    pub execution_role_arn: String,
    pub model_data_download_timeout_secs: u32,
    pub container_startup_timeout_secs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_scaling: Option<InstanceScaling>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointSpec {
    pub name: ResourceName,
    pub endpoint_config_name: ResourceName,
}

/// A model placed on an endpoint with its own resource request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceComponentSpec {
    pub name: ResourceName,
    pub endpoint_name: ResourceName,
    pub variant_name: String,
    pub model_name: ResourceName,
    pub resources: ResourceRequest,
}

/// Everything created for one deployable unit, in creation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentPlan {
    pub model: ModelSpec,
    pub endpoint_config: EndpointConfigSpec,
    pub endpoint: EndpointSpec,
    pub inference_component: InferenceComponentSpec,
}
