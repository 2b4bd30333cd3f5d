//! Metrics recording and instrumented handlers

mod instrumented;
mod metrics;

pub use instrumented::InstrumentedHandler;
pub use self::metrics::{record_invocation, record_pipeline_run, record_scale};
