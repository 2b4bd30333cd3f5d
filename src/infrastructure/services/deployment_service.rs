//! Deployment service - create, wait on, scale and tear down hosted models

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::domain::{DeploymentPlan, DomainError, EndpointControl, EndpointStatus};
use crate::infrastructure::observability::record_scale;

/// How long and how often to poll while resources come up or go away
#[derive(Debug, Clone, Copy)]
pub struct WaitConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            timeout: Duration::from_secs(3600),
        }
    }
}

/// Names of everything a deployment created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentHandle {
    pub model_name: String,
    pub endpoint_config_name: String,
    pub endpoint_name: String,
    pub inference_component_name: String,
    pub variant_name: String,
}

impl From<&DeploymentPlan> for DeploymentHandle {
    fn from(plan: &DeploymentPlan) -> Self {
        Self {
            model_name: plan.model.name.to_string(),
            endpoint_config_name: plan.endpoint_config.name.to_string(),
            endpoint_name: plan.endpoint.name.to_string(),
            inference_component_name: plan.inference_component.name.to_string(),
            variant_name: plan.inference_component.variant_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Watched<'a> {
    Endpoint(&'a str),
    Component(&'a str),
}

impl Watched<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Endpoint(_) => "Endpoint",
            Self::Component(_) => "Inference component",
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Endpoint(name) | Self::Component(name) => name,
        }
    }
}

/// Deployment service over a control-plane client
#[derive(Debug)]
pub struct DeploymentService<C: EndpointControl> {
    control: Arc<C>,
    wait: WaitConfig,
}

impl<C: EndpointControl> DeploymentService<C> {
    pub fn new(control: Arc<C>, wait: WaitConfig) -> Self {
        Self { control, wait }
    }

    /// Create model, endpoint config and endpoint, wait for the endpoint,
    /// then place the inference component and wait for it
    ///
    /// Resources created before a failure are left in place; the error
    /// names the step that failed.
    #[instrument(skip(self, plan), fields(endpoint = %plan.endpoint.name))]
    pub async fn deploy(&self, plan: &DeploymentPlan) -> Result<DeploymentHandle, DomainError> {
        self.control.create_model(&plan.model).await?;
        self.control
            .create_endpoint_config(&plan.endpoint_config)
            .await?;
        self.control.create_endpoint(&plan.endpoint).await?;

        self.wait_in_service(Watched::Endpoint(plan.endpoint.name.as_str()))
            .await?;

        self.control
            .create_inference_component(&plan.inference_component)
            .await?;

        self.wait_in_service(Watched::Component(plan.inference_component.name.as_str()))
            .await?;

        let handle = DeploymentHandle::from(plan);
        info!(
            endpoint = %handle.endpoint_name,
            component = %handle.inference_component_name,
            "Deployment in service"
        );

        Ok(handle)
    }

    /// Set the copy count of an inference component
    ///
    /// Zero copies is allowed and releases the component's accelerators.
    #[instrument(skip(self))]
    pub async fn scale(&self, component: &str, copies: u32) -> Result<(), DomainError> {
        self.control.update_copy_count(component, copies).await?;
        record_scale(component, copies);
        Ok(())
    }

    /// Scale and wait until the component is back in service
    ///
    /// The first poll happens one interval after the update so a status
    /// read before the update starts is not mistaken for completion.
    pub async fn scale_and_wait(&self, component: &str, copies: u32) -> Result<(), DomainError> {
        self.scale(component, copies).await?;
        tokio::time::sleep(self.wait.poll_interval).await;
        self.wait_in_service(Watched::Component(component)).await
    }

    pub async fn endpoint_status(&self, endpoint: &str) -> Result<EndpointStatus, DomainError> {
        self.control.describe_endpoint(endpoint).await
    }

    pub async fn component_status(&self, component: &str) -> Result<EndpointStatus, DomainError> {
        self.control.describe_inference_component(component).await
    }

    /// Delete component, endpoint, endpoint config and model in that order
    ///
    /// Missing resources are skipped. Every deletion is attempted; the first
    /// error other than not-found is returned.
    #[instrument(skip(self, handle), fields(endpoint = %handle.endpoint_name))]
    pub async fn teardown(&self, handle: &DeploymentHandle) -> Result<(), DomainError> {
        let mut first_error = None;

        let component = &handle.inference_component_name;
        match self.control.delete_inference_component(component).await {
            Ok(()) => {
                if let Err(e) = self.wait_deleted(component).await {
                    keep_first(&mut first_error, e);
                }
            }
            Err(e) => keep_first(&mut first_error, e),
        }

        let endpoint = self.control.delete_endpoint(&handle.endpoint_name).await;
        if let Err(e) = endpoint {
            keep_first(&mut first_error, e);
        }

        let config = self
            .control
            .delete_endpoint_config(&handle.endpoint_config_name)
            .await;
        if let Err(e) = config {
            keep_first(&mut first_error, e);
        }

        let model = self.control.delete_model(&handle.model_name).await;
        if let Err(e) = model {
            keep_first(&mut first_error, e);
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("Teardown complete");
                Ok(())
            }
        }
    }

    async fn describe(&self, watched: Watched<'_>) -> Result<EndpointStatus, DomainError> {
        match watched {
            Watched::Endpoint(name) => self.control.describe_endpoint(name).await,
            Watched::Component(name) => self.control.describe_inference_component(name).await,
        }
    }

    async fn wait_in_service(&self, watched: Watched<'_>) -> Result<(), DomainError> {
        let deadline = Instant::now() + self.wait.timeout;

        loop {
            let status = self.describe(watched).await?;
            debug!(kind = watched.kind(), name = watched.name(), %status, "Polled status");

            match &status {
                EndpointStatus::InService => return Ok(()),
                EndpointStatus::Failed(reason) => {
                    return Err(DomainError::provider(
                        "sagemaker",
                        format!(
                            "{} '{}' failed: {}",
                            watched.kind(),
                            watched.name(),
                            reason.as_deref().unwrap_or("no reason given")
                        ),
                    ));
                }
                _ => {}
            }

            if Instant::now() + self.wait.poll_interval > deadline {
                return Err(DomainError::timeout(format!(
                    "{} '{}' not in service after {:?} (last status {})",
                    watched.kind(),
                    watched.name(),
                    self.wait.timeout,
                    status
                )));
            }

            tokio::time::sleep(self.wait.poll_interval).await;
        }
    }

    async fn wait_deleted(&self, component: &str) -> Result<(), DomainError> {
        let deadline = Instant::now() + self.wait.timeout;

        loop {
            match self.control.describe_inference_component(component).await {
                Err(e) if e.is_not_found() => return Ok(()),
                Err(e) => return Err(e),
                Ok(status) => {
                    debug!(component = %component, %status, "Waiting for deletion");
                }
            }

            if Instant::now() + self.wait.poll_interval > deadline {
                return Err(DomainError::timeout(format!(
                    "Inference component '{}' still present after {:?}",
                    component, self.wait.timeout
                )));
            }

            tokio::time::sleep(self.wait.poll_interval).await;
        }
    }
}

fn keep_first(slot: &mut Option<DomainError>, err: DomainError) {
    if err.is_not_found() {
        warn!(error = %err, "Resource already gone");
        return;
    }

    warn!(error = %err, "Teardown step failed");
    if slot.is_none() {
        *slot = Some(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use mockall::predicate::eq;
    use mockall::Sequence;

    use crate::domain::endpoint::MockEndpointControl;
    use crate::domain::{DeploymentBuilder, ModelReference, ResourceRequest};

    fn fast_wait() -> WaitConfig {
        WaitConfig {
            poll_interval: Duration::from_millis(1),
            timeout: Duration::from_millis(200),
        }
    }

    fn plan() -> DeploymentPlan {
        DeploymentBuilder::new("llama", ModelReference::hub("meta-llama/Llama-2-7b-chat-hf"))
            .instance_type("ml.g5.2xlarge")
            .resources(ResourceRequest::new(8192).with_accelerators(1))
            .execution_role("arn:aws:iam::123456789012:role/Role")
            .region("us-east-1")
            .build()
            .unwrap()
    }

    fn handle() -> DeploymentHandle {
        DeploymentHandle {
            model_name: "m".to_string(),
            endpoint_config_name: "cfg".to_string(),
            endpoint_name: "ep".to_string(),
            inference_component_name: "ic".to_string(),
            variant_name: "AllTraffic".to_string(),
        }
    }

    #[tokio::test]
    async fn test_deploy_creates_in_order_and_waits() {
        let plan = plan();
        let mut control = MockEndpointControl::new();
        let mut seq = Sequence::new();

        control
            .expect_create_model()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        control
            .expect_create_endpoint_config()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        control
            .expect_create_endpoint()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let polls = AtomicU32::new(0);
        control
            .expect_describe_endpoint()
            .times(3)
            .returning(move |_| {
                if polls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Ok(EndpointStatus::Creating)
                } else {
                    Ok(EndpointStatus::InService)
                }
            });
        control
            .expect_create_inference_component()
            .times(1)
            .returning(|_| Ok(()));
        control
            .expect_describe_inference_component()
            .times(1)
            .returning(|_| Ok(EndpointStatus::InService));

        let service = DeploymentService::new(Arc::new(control), fast_wait());
        let handle = service.deploy(&plan).await.unwrap();

        assert_eq!(handle.endpoint_name, plan.endpoint.name.as_str());
        assert_eq!(
            handle.inference_component_name,
            plan.inference_component.name.as_str()
        );
        assert_eq!(handle.variant_name, "AllTraffic");
    }

    #[tokio::test]
    async fn test_deploy_stops_on_failed_endpoint() {
        let mut control = MockEndpointControl::new();
        control.expect_create_model().returning(|_| Ok(()));
        control.expect_create_endpoint_config().returning(|_| Ok(()));
        control.expect_create_endpoint().returning(|_| Ok(()));
        control
            .expect_describe_endpoint()
            .returning(|_| Ok(EndpointStatus::Failed(Some("Image not found".to_string()))));
        control.expect_create_inference_component().never();

        let service = DeploymentService::new(Arc::new(control), fast_wait());
        let err = service.deploy(&plan()).await.unwrap_err();

        assert!(matches!(err, DomainError::Provider { .. }));
        assert!(err.to_string().contains("Image not found"));
    }

    #[tokio::test]
    async fn test_deploy_times_out() {
        let mut control = MockEndpointControl::new();
        control.expect_create_model().returning(|_| Ok(()));
        control.expect_create_endpoint_config().returning(|_| Ok(()));
        control.expect_create_endpoint().returning(|_| Ok(()));
        control
            .expect_describe_endpoint()
            .returning(|_| Ok(EndpointStatus::Creating));

        let wait = WaitConfig {
            poll_interval: Duration::from_millis(5),
            timeout: Duration::from_millis(20),
        };
        let service = DeploymentService::new(Arc::new(control), wait);
        let err = service.deploy(&plan()).await.unwrap_err();

        assert!(matches!(err, DomainError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_deploy_propagates_create_error() {
        let mut control = MockEndpointControl::new();
        control.expect_create_model().returning(|_| {
            Err(DomainError::provider("sagemaker", "AccessDenied"))
        });
        control.expect_create_endpoint_config().never();

        let service = DeploymentService::new(Arc::new(control), fast_wait());
        assert!(service.deploy(&plan()).await.is_err());
    }

    #[tokio::test]
    async fn test_scale_allows_zero() {
        let mut control = MockEndpointControl::new();
        control
            .expect_update_copy_count()
            .with(eq("ic"), eq(0u32))
            .times(1)
            .returning(|_, _| Ok(()));

        let service = DeploymentService::new(Arc::new(control), fast_wait());
        service.scale("ic", 0).await.unwrap();
    }

    #[tokio::test]
    async fn test_deploy_stops_on_failed_component() {
        let plan = plan();
        let component = plan.inference_component.name.to_string();

        let mut control = MockEndpointControl::new();
        control.expect_create_model().returning(|_| Ok(()));
        control.expect_create_endpoint_config().returning(|_| Ok(()));
        control.expect_create_endpoint().returning(|_| Ok(()));
        control
            .expect_describe_endpoint()
            .returning(|_| Ok(EndpointStatus::InService));
        control
            .expect_create_inference_component()
            .times(1)
            .returning(|_| Ok(()));
        control
            .expect_describe_inference_component()
            .with(eq(component.clone()))
            .times(2)
            .returning({
                let polls = AtomicU32::new(0);
                move |_| {
                    if polls.fetch_add(1, Ordering::SeqCst) == 0 {
                        Ok(EndpointStatus::Creating)
                    } else {
                        Ok(EndpointStatus::Failed(Some(
                            "Insufficient accelerator memory".to_string(),
                        )))
                    }
                }
            });

        let service = DeploymentService::new(Arc::new(control), fast_wait());
        let err = service.deploy(&plan).await.unwrap_err();

        assert!(matches!(err, DomainError::Provider { .. }));
        let message = err.to_string();
        assert!(message.contains("Inference component"));
        assert!(message.contains(&component));
        assert!(message.contains("Insufficient accelerator memory"));
    }

    #[tokio::test]
    async fn test_scale_and_wait_polls_until_in_service() {
        let mut control = MockEndpointControl::new();
        let mut seq = Sequence::new();

        control
            .expect_update_copy_count()
            .with(eq("ic"), eq(3u32))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        control
            .expect_describe_inference_component()
            .with(eq("ic"))
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Ok(EndpointStatus::Updating));
        control
            .expect_describe_inference_component()
            .with(eq("ic"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(EndpointStatus::InService));

        let service = DeploymentService::new(Arc::new(control), fast_wait());
        service.scale_and_wait("ic", 3).await.unwrap();
    }

    #[tokio::test]
    async fn test_scale_and_wait_waits_one_interval_before_first_poll() {
        let mut control = MockEndpointControl::new();
        control.expect_update_copy_count().returning(|_, _| Ok(()));
        control
            .expect_describe_inference_component()
            .times(1)
            .returning(|_| Ok(EndpointStatus::InService));

        let wait = WaitConfig {
            poll_interval: Duration::from_millis(20),
            timeout: Duration::from_millis(500),
        };
        let service = DeploymentService::new(Arc::new(control), wait);

        let start = std::time::Instant::now();
        service.scale_and_wait("ic", 2).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_scale_and_wait_reports_failure() {
        let mut control = MockEndpointControl::new();
        control.expect_update_copy_count().returning(|_, _| Ok(()));
        control
            .expect_describe_inference_component()
            .returning(|_| Ok(EndpointStatus::Failed(None)));

        let service = DeploymentService::new(Arc::new(control), fast_wait());
        let err = service.scale_and_wait("ic", 2).await.unwrap_err();

        assert!(matches!(err, DomainError::Provider { .. }));
        assert!(err.to_string().contains("no reason given"));
    }

    #[tokio::test]
    async fn test_teardown_waits_for_component_deletion() {
        let mut control = MockEndpointControl::new();
        let mut seq = Sequence::new();

        control
            .expect_delete_inference_component()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        control
            .expect_describe_inference_component()
            .with(eq("ic"))
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Ok(EndpointStatus::Deleting));
        control
            .expect_describe_inference_component()
            .with(eq("ic"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(DomainError::not_found("ic")));
        control
            .expect_delete_endpoint()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        control.expect_delete_endpoint_config().returning(|_| Ok(()));
        control.expect_delete_model().returning(|_| Ok(()));

        let service = DeploymentService::new(Arc::new(control), fast_wait());
        service.teardown(&handle()).await.unwrap();
    }

    #[tokio::test]
    async fn test_teardown_component_deletion_timeout() {
        let mut control = MockEndpointControl::new();
        control.expect_delete_inference_component().returning(|_| Ok(()));
        control
            .expect_describe_inference_component()
            .returning(|_| Ok(EndpointStatus::Deleting));
        control.expect_delete_endpoint().times(1).returning(|_| Ok(()));
        control.expect_delete_endpoint_config().times(1).returning(|_| Ok(()));
        control.expect_delete_model().times(1).returning(|_| Ok(()));

        let wait = WaitConfig {
            poll_interval: Duration::from_millis(5),
            timeout: Duration::from_millis(20),
        };
        let service = DeploymentService::new(Arc::new(control), wait);
        let err = service.teardown(&handle()).await.unwrap_err();

        assert!(matches!(err, DomainError::Timeout { .. }));
        assert!(err.to_string().contains("'ic' still present"));
    }

    #[tokio::test]
    async fn test_teardown_order() {
        let mut control = MockEndpointControl::new();
        let mut seq = Sequence::new();

        control
            .expect_delete_inference_component()
            .with(eq("ic"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        control
            .expect_describe_inference_component()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(DomainError::not_found("ic")));
        control
            .expect_delete_endpoint()
            .with(eq("ep"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        control
            .expect_delete_endpoint_config()
            .with(eq("cfg"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        control
            .expect_delete_model()
            .with(eq("m"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let service = DeploymentService::new(Arc::new(control), fast_wait());
        service.teardown(&handle()).await.unwrap();
    }

    #[tokio::test]
    async fn test_teardown_skips_missing_and_reports_first_error() {
        let mut control = MockEndpointControl::new();
        control
            .expect_delete_inference_component()
            .returning(|_| Err(DomainError::not_found("ic")));
        control
            .expect_delete_endpoint()
            .returning(|_| Err(DomainError::provider("sagemaker", "endpoint busy")));
        control
            .expect_delete_endpoint_config()
            .times(1)
            .returning(|_| Err(DomainError::provider("sagemaker", "config busy")));
        control.expect_delete_model().times(1).returning(|_| Ok(()));

        let service = DeploymentService::new(Arc::new(control), fast_wait());
        let err = service.teardown(&handle()).await.unwrap_err();

        assert!(err.to_string().contains("endpoint busy"));
    }

    #[tokio::test]
    async fn test_teardown_all_missing_is_ok() {
        let mut control = MockEndpointControl::new();
        control
            .expect_delete_inference_component()
            .returning(|_| Err(DomainError::not_found("ic")));
        control
            .expect_delete_endpoint()
            .returning(|_| Err(DomainError::not_found("ep")));
        control
            .expect_delete_endpoint_config()
            .returning(|_| Err(DomainError::not_found("cfg")));
        control
            .expect_delete_model()
            .returning(|_| Err(DomainError::not_found("m")));

        let service = DeploymentService::new(Arc::new(control), fast_wait());
        assert!(service.teardown(&handle()).await.is_ok());
    }

    #[test]
    fn test_handle_round_trips_as_json() {
        let handle = DeploymentHandle::from(&plan());
        let json = serde_json::to_string(&handle).unwrap();
        let parsed: DeploymentHandle = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, handle);
    }
}
