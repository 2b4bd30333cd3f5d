//! Metrics recorded through the `metrics` facade
//!
//! Nothing is exported unless the embedding application installs a recorder.

use std::time::Duration;

use metrics::{counter, gauge, histogram};

use crate::domain::InvocationTarget;

fn status_label(success: bool) -> &'static str {
    if success { "success" } else { "error" }
}

/// Record one endpoint invocation
pub fn record_invocation(target: &InvocationTarget, success: bool, duration: Duration) {
    let labels = [
        ("endpoint", target.endpoint.clone()),
        ("component", target.component_label().to_string()),
    ];

    counter!(
        "endpoint_invocations_total",
        "endpoint" => target.endpoint.clone(),
        "component" => target.component_label().to_string(),
        "status" => status_label(success)
    )
    .increment(1);
    histogram!("endpoint_invocation_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Record one handler run
pub fn record_pipeline_run(name: &str, success: bool, duration: Duration) {
    counter!(
        "pipeline_runs_total",
        "pipeline" => name.to_string(),
        "status" => status_label(success)
    )
    .increment(1);
    histogram!("pipeline_run_duration_seconds", "pipeline" => name.to_string())
        .record(duration.as_secs_f64());
}

/// Record a copy count change
pub fn record_scale(component: &str, copies: u32) {
    counter!("component_scale_operations_total", "component" => component.to_string())
        .increment(1);
    gauge!("component_desired_copies", "component" => component.to_string())
        .set(copies as f64);
}

