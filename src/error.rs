//! Typed failures for inter-service calls.
//!
//! # Responsibilities
//! - Distinguish connectivity-class failures (try the next endpoint now)
//!   from response-class failures (back off, then retry)
//! - Carry enough structure for callers to decide "known bad, don't retry"
//!   vs "transient, safe to retry later"
//! - Preserve the full per-attempt trail when a call exhausts its retries

use std::time::Duration;

use http::StatusCode;
use thiserror::Error;

/// Diagnostic record of a single endpoint attempt within one logical call.
///
/// Accumulated while a call walks its candidate endpoints; returned inside
/// [`CallError::ExhaustedRetries`] when every attempt failed.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    /// Base URL of the endpoint the attempt targeted, e.g. `http://audit:8005`.
    pub endpoint: String,
    /// What went wrong.
    pub error: String,
    /// How long the attempt ran before failing.
    pub duration: Duration,
}

/// Errors surfaced by [`ServiceClient::call`](crate::client::ServiceClient::call).
#[derive(Debug, Error)]
pub enum CallError {
    /// The service name is not in the configuration. Almost always a typo in
    /// the calling handler; surfaced as an error rather than a panic so a bad
    /// route cannot take the process down.
    #[error("unknown service '{0}'")]
    UnknownService(String),

    /// DNS or connection-level failure; the endpoint never produced a response.
    #[error("connection to {endpoint} failed: {message}")]
    Connectivity { endpoint: String, message: String },

    /// The attempt exceeded the per-attempt deadline.
    #[error("request to {endpoint} timed out after {timeout_ms}ms")]
    Timeout { endpoint: String, timeout_ms: u64 },

    /// The endpoint answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Http { endpoint: String, status: StatusCode },

    /// The breaker for the target service is open; the call was rejected
    /// without any network attempt.
    #[error("circuit for '{service}' is open, retry in ~{retry_after_ms}ms")]
    CircuitOpen { service: String, retry_after_ms: u64 },

    /// Every candidate endpoint failed within the retry budget.
    #[error("all {count} attempts against '{service}' failed", count = .trail.len())]
    ExhaustedRetries {
        service: String,
        trail: Vec<AttemptRecord>,
    },
}

impl CallError {
    /// Connectivity-class failures skip straight to the next candidate
    /// endpoint; response-class failures back off first.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }

    /// True when the breaker rejected the call without attempting it.
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, Self::CircuitOpen { .. })
    }

    /// Stable label for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownService(_) => "unknown_service",
            Self::Connectivity { .. } => "connectivity",
            Self::Timeout { .. } => "timeout",
            Self::Http { .. } => "http",
            Self::CircuitOpen { .. } => "circuit_open",
            Self::ExhaustedRetries { .. } => "exhausted_retries",
        }
    }
}

/// Result type for inter-service calls.
pub type CallResult<T> = Result<T, CallError>;
