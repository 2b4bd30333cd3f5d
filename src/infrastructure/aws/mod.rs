//! Shared AWS SDK setup and error mapping

use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;

use crate::domain::DomainError;

/// Error codes the services use for a missing resource
const NOT_FOUND_CODES: &[&str] = &["ResourceNotFound", "ResourceNotFoundException"];

/// Load the SDK config from the default provider chain, optionally pinning
/// the region
pub async fn load_sdk_config(region: Option<&str>) -> aws_config::SdkConfig {
    if let Some(region) = region {
        aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await
    } else {
        aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await
    }
}

/// Map an SDK error to a domain error
///
/// SageMaker reports missing resources as a `ValidationException` whose
/// message starts with "Could not find"; those become
/// [`DomainError::NotFound`] like the explicit not-found codes.
pub fn map_sdk_error<E>(provider: &str, action: &str, resource: &str, err: E) -> DomainError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let code = err.code().unwrap_or_default();
    let message = err.message().unwrap_or_default();

    if NOT_FOUND_CODES.contains(&code) || message.starts_with("Could not find") {
        return DomainError::not_found(format!("{} '{}': {}", action, resource, message));
    }

    DomainError::provider(
        provider,
        format!("{} '{}' failed: {}", action, resource, DisplayErrorContext(&err)),
    )
}
