//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to a service:
//!     → circuit_breaker.rs (gate check, fail fast when open)
//!     → retries.rs (walk candidates, classify failures, bound attempts)
//!     → backoff.rs (delay between response-class retries)
//!     → outcome reported back to circuit_breaker.rs
//! ```
//!
//! # Design Decisions
//! - Every attempt has a deadline; timeouts are response-class failures
//! - Connectivity failures cost no delay, the next candidate is tried at once
//! - The breaker sees one outcome per logical call, not per attempt

pub mod backoff;
pub mod circuit_breaker;
pub mod retries;

pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use retries::RetryExecutor;
