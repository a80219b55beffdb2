//! Metrics collection.
//!
//! # Metrics
//! - `service_client_requests_total` (counter): calls by service, outcome
//! - `service_client_request_duration_seconds` (histogram): call latency
//! - `service_client_breaker_state` (gauge): 0=closed, 1=half-open, 2=open
//! - `service_client_service_health` (gauge): 1=healthy, 0=unhealthy
//!
//! # Design Decisions
//! - Records through the `metrics` facade only; the embedding process
//!   installs whatever exporter it wants
//! - Label values are the logical service name, never an endpoint address,
//!   to keep cardinality bounded

use std::time::Duration;

use crate::resilience::CircuitState;

/// Record the outcome and latency of one logical call.
pub fn record_call(service: &str, outcome: &'static str, duration: Duration) {
    metrics::counter!(
        "service_client_requests_total",
        "service" => service.to_string(),
        "outcome" => outcome,
    )
    .increment(1);
    metrics::histogram!(
        "service_client_request_duration_seconds",
        "service" => service.to_string(),
    )
    .record(duration.as_secs_f64());
}

/// Record a breaker transition.
pub fn record_breaker_state(service: &str, state: CircuitState) {
    let value = match state {
        CircuitState::Closed => 0.0,
        CircuitState::HalfOpen => 1.0,
        CircuitState::Open => 2.0,
    };
    metrics::gauge!(
        "service_client_breaker_state",
        "service" => service.to_string(),
    )
    .set(value);
}

/// Record a health probe verdict.
pub fn record_service_health(service: &str, healthy: bool) {
    metrics::gauge!(
        "service_client_service_health",
        "service" => service.to_string(),
    )
    .set(if healthy { 1.0 } else { 0.0 });
}
