use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics exporter
pub fn init_metrics() -> PrometheusHandle {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    init_metric_descriptions();

    handle
}

fn init_metric_descriptions() {
    describe_counter!(
        "planner_calculations_total",
        "Total number of planning requests served"
    );
    describe_counter!(
        "planner_combinations_evaluated_total",
        "Combinations costed before the feasibility filter"
    );
    describe_counter!(
        "planner_combinations_feasible_total",
        "Combinations returned after the feasibility filter"
    );
    describe_histogram!(
        "planner_calculation_duration_seconds",
        "Planning duration in seconds"
    );
    describe_counter!(
        "planner_invalid_requests_total",
        "Requests rejected as invalid input"
    );
    describe_gauge!("planner_info", "Planner version information");

    gauge!("planner_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

fn voice_mode(use_voice_agent: bool) -> &'static str {
    if use_voice_agent {
        "agent"
    } else {
        "inbuilt"
    }
}

/// Record a completed calculation
pub fn record_calculation(use_voice_agent: bool, evaluated: usize, feasible: usize, duration: Duration) {
    counter!("planner_calculations_total", "voice_mode" => voice_mode(use_voice_agent)).increment(1);
    counter!("planner_combinations_evaluated_total").increment(evaluated as u64);
    counter!("planner_combinations_feasible_total").increment(feasible as u64);
    histogram!("planner_calculation_duration_seconds").record(duration.as_secs_f64());
}

pub fn record_invalid_request() {
    counter!("planner_invalid_requests_total").increment(1);
}
