//! Circuit breaker for downstream service protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: service assumed down, calls fail fast
//! - Half-Open: testing if the service recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive logical-call failures >= failure_threshold
//! Open → Half-Open: first call after reset_timeout_ms becomes the trial
//! Half-Open → Closed: trial succeeds
//! Half-Open → Open: trial fails (or its future is dropped mid-flight)
//! ```
//!
//! # Design Decisions
//! - Per-service breaker (not global)
//! - Fail fast in Open state, carrying the time until the next trial window
//! - Exactly one trial in Half-Open; concurrent callers are rejected as if
//!   the circuit were still open
//! - A call counts as one failure only after every fallback endpoint has
//!   been exhausted; the breaker wraps the whole retry walk

use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

use crate::config::BreakerConfig;
use crate::error::CallError;
use crate::observability::metrics::record_breaker_state;

/// The current state of a circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
            Self::HalfOpen => write!(f, "half-open"),
        }
    }
}

#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    failure_count: u32,
    last_failure_at: Option<Instant>,
    /// May be true only while state is HalfOpen; at most one trial at a time.
    trial_in_flight: bool,
}

/// Per-service circuit breaker.
///
/// All transitions happen under one mutex, never held across an await, so
/// admission of the trial call is serialized against every other caller.
#[derive(Debug)]
pub struct CircuitBreaker {
    service: String,
    failure_threshold: u32,
    reset_timeout: Duration,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(service: impl Into<String>, config: &BreakerConfig) -> Self {
        Self {
            service: service.into(),
            failure_threshold: config.failure_threshold,
            reset_timeout: Duration::from_millis(config.reset_timeout_ms),
            inner: Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                failure_count: 0,
                last_failure_at: None,
                trial_in_flight: false,
            }),
        }
    }

    /// Run `operation` under the breaker's admission protocol.
    ///
    /// In Open state the operation is not invoked at all; the caller gets
    /// [`CallError::CircuitOpen`] immediately. The operation's result drives
    /// the next transition.
    pub async fn execute<T, F, Fut>(&self, operation: F) -> Result<T, CallError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CallError>>,
    {
        let trial = self.admit()?;
        let mut guard = TrialGuard {
            breaker: self,
            armed: trial,
        };

        let result = operation().await;
        guard.armed = false;

        match &result {
            Ok(_) => self.record_success(trial),
            Err(_) => self.record_failure(trial),
        }
        result
    }

    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    pub fn failure_count(&self) -> u32 {
        self.lock().failure_count
    }

    /// Returns true when admitted as the half-open trial.
    fn admit(&self) -> Result<bool, CallError> {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => Ok(false),
            CircuitState::Open => {
                let elapsed = inner
                    .last_failure_at
                    .map(|t| t.elapsed())
                    .unwrap_or_default();
                if elapsed >= self.reset_timeout {
                    inner.state = CircuitState::HalfOpen;
                    inner.trial_in_flight = true;
                    tracing::info!(service = %self.service, "Circuit half-open, admitting trial call");
                    record_breaker_state(&self.service, CircuitState::HalfOpen);
                    Ok(true)
                } else {
                    let remaining = self.reset_timeout - elapsed;
                    Err(CallError::CircuitOpen {
                        service: self.service.clone(),
                        retry_after_ms: remaining.as_millis() as u64,
                    })
                }
            }
            CircuitState::HalfOpen => {
                if inner.trial_in_flight {
                    // trial outcome is imminent, reject like Open
                    Err(CallError::CircuitOpen {
                        service: self.service.clone(),
                        retry_after_ms: 0,
                    })
                } else {
                    inner.trial_in_flight = true;
                    Ok(true)
                }
            }
        }
    }

    fn record_success(&self, trial: bool) {
        let mut inner = self.lock();
        if trial {
            inner.state = CircuitState::Closed;
            inner.failure_count = 0;
            inner.trial_in_flight = false;
            inner.last_failure_at = None;
            tracing::info!(service = %self.service, "Circuit closed after successful trial");
            record_breaker_state(&self.service, CircuitState::Closed);
        } else {
            inner.failure_count = 0;
        }
    }

    fn record_failure(&self, trial: bool) {
        let mut inner = self.lock();
        if trial {
            inner.state = CircuitState::Open;
            inner.trial_in_flight = false;
            inner.last_failure_at = Some(Instant::now());
            tracing::warn!(service = %self.service, "Circuit re-opened after failed trial");
            record_breaker_state(&self.service, CircuitState::Open);
        } else {
            inner.failure_count += 1;
            if inner.state == CircuitState::Closed && inner.failure_count >= self.failure_threshold
            {
                inner.state = CircuitState::Open;
                inner.last_failure_at = Some(Instant::now());
                tracing::warn!(
                    service = %self.service,
                    failures = inner.failure_count,
                    "Circuit opened"
                );
                record_breaker_state(&self.service, CircuitState::Open);
            }
        }
    }

    fn abandon_trial(&self) {
        let mut inner = self.lock();
        if inner.state == CircuitState::HalfOpen && inner.trial_in_flight {
            inner.state = CircuitState::Open;
            inner.trial_in_flight = false;
            inner.last_failure_at = Some(Instant::now());
            tracing::warn!(service = %self.service, "Trial call dropped mid-flight, circuit re-opened");
            record_breaker_state(&self.service, CircuitState::Open);
        }
    }

    fn lock(&self) -> MutexGuard<'_, BreakerInner> {
        // breaker state is plain data, a poisoned lock is still usable
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Reverts a half-open trial whose future was dropped before completing, so
/// `trial_in_flight` can never wedge the breaker.
struct TrialGuard<'a> {
    breaker: &'a CircuitBreaker,
    armed: bool,
}

impl Drop for TrialGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.breaker.abandon_trial();
        }
    }
}
