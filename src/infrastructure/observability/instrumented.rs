use std::time::Instant;

use async_trait::async_trait;
use tracing::{error, info, info_span, Instrument};

use super::record_pipeline_run;
use crate::domain::{DomainError, InferenceHandler};

/// Wraps a handler with a tracing span and run metrics
pub struct InstrumentedHandler<H: InferenceHandler> {
    name: String,
    inner: H,
}

impl<H: InferenceHandler> InstrumentedHandler<H> {
    pub fn new(name: impl Into<String>, inner: H) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

#[async_trait]
impl<H: InferenceHandler> InferenceHandler for InstrumentedHandler<H> {
    async fn handle(&self, body: Vec<u8>) -> Result<Vec<u8>, DomainError> {
        let span = info_span!("handler", name = %self.name, request_bytes = body.len());
        let start = Instant::now();

        let result = self.inner.handle(body).instrument(span).await;
        let elapsed = start.elapsed();

        record_pipeline_run(&self.name, result.is_ok(), elapsed);

        match &result {
            Ok(response) => info!(
                name = %self.name,
                response_bytes = response.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Handler completed"
            ),
            Err(e) => error!(name = %self.name, error = %e, "Handler failed"),
        }

        result
    }
}
