use async_trait::async_trait;

use crate::domain::DomainError;

/// Handles one inference request body and returns the response body
#[async_trait]
pub trait InferenceHandler: Send + Sync {
    async fn handle(&self, body: Vec<u8>) -> Result<Vec<u8>, DomainError>;
}
