//! Compute resources requested for one inference component

use serde::{Deserialize, Serialize};

use super::validation::ResourceValidationError;

/// Declarative memory, accelerator and CPU needs, plus the number of copies
/// the service should place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequest {
    /// Minimum memory reserved per copy, in MB
    pub min_memory_mb: u32,

    /// Accelerator devices per copy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accelerator_count: Option<u32>,

    /// CPU cores per copy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_count: Option<f32>,

    /// Number of copies (replicas) to run
    #[serde(default = "default_copy_count")]
    pub copy_count: u32,
}

fn default_copy_count() -> u32 {
    1
}

impl ResourceRequest {
    pub fn new(min_memory_mb: u32) -> Self {
        Self {
            min_memory_mb,
            accelerator_count: None,
            cpu_count: None,
            copy_count: default_copy_count(),
        }
    }

    pub fn with_accelerators(mut self, count: u32) -> Self {
        self.accelerator_count = Some(count);
        self
    }

    pub fn with_cpus(mut self, count: f32) -> Self {
        self.cpu_count = Some(count);
        self
    }

    pub fn with_copies(mut self, count: u32) -> Self {
        self.copy_count = count;
        self
    }

    /// Check the request before it is handed to the service
    pub fn validate(&self) -> Result<(), ResourceValidationError> {
        if self.min_memory_mb == 0 {
            return Err(ResourceValidationError::InvalidMemory);
        }

        if let Some(cpus) = self.cpu_count {
            if cpus.is_nan() || cpus <= 0.0 {
                return Err(ResourceValidationError::InvalidCpuCount { value: cpus });
            }
        }

        if self.copy_count == 0 {
            return Err(ResourceValidationError::InvalidCopyCount);
        }

        Ok(())
    }

    /// Accelerators each copy needs, zero when none were requested
    pub fn accelerators(&self) -> u32 {
        self.accelerator_count.unwrap_or(0)
    }
}
