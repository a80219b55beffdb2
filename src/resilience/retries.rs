//! Retry execution across endpoint candidates.
//!
//! # Responsibilities
//! - Walk a service's candidate endpoints in order
//! - Classify failures: connectivity-class moves to the next candidate with
//!   no delay, response-class backs off before the next attempt
//! - Bound total attempts by the service's retry budget
//! - Keep the per-attempt trail for the exhaustion error
//!
//! # Design Decisions
//! - Per-attempt timeouts are enforced here, not in the transport
//! - A response-class failure stays on the same endpoint: it answered, so
//!   it is reachable, and backoff already protects it
//! - The candidate cursor wraps, so a lone endpoint gets every attempt

use std::time::Duration;

use tokio::time::Instant;

use crate::client::{CallOptions, ServiceResponse};
use crate::endpoints::{ResolvedService, ServiceEndpoint};
use crate::error::{AttemptRecord, CallError};
use crate::resilience::backoff::calculate_backoff;
use crate::transport::{Transport, TransportRequest};

/// Executes one logical call as a bounded series of endpoint attempts.
#[derive(Debug, Clone)]
pub struct RetryExecutor<T> {
    transport: T,
}

impl<T: Transport> RetryExecutor<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Attempt the call until one endpoint succeeds or the budget runs out.
    ///
    /// The breaker above this layer treats the whole walk as a single
    /// logical success or failure.
    pub async fn attempt(
        &self,
        service: &ResolvedService,
        path: &str,
        options: &CallOptions,
    ) -> Result<ServiceResponse, CallError> {
        let name = &service.config.name;
        let policy = &service.config.retry;
        let timeout = Duration::from_millis(service.config.timeout_ms);
        let candidates = &service.candidates;

        let mut trail: Vec<AttemptRecord> = Vec::new();
        let mut cursor = 0usize;

        if candidates.is_empty() {
            // an empty candidate list exhausts immediately
            return Err(CallError::ExhaustedRetries {
                service: name.clone(),
                trail,
            });
        }

        for attempt in 1..=policy.max_retries {
            let endpoint = &candidates[cursor % candidates.len()];
            let started = Instant::now();

            match self.send_once(endpoint, path, options, timeout).await {
                Ok(response) => {
                    tracing::debug!(
                        service = %name,
                        endpoint = %endpoint,
                        attempt,
                        status = %response.status,
                        "Request succeeded"
                    );
                    return Ok(response);
                }
                Err(err) => {
                    tracing::warn!(
                        service = %name,
                        endpoint = %endpoint,
                        attempt,
                        error = %err,
                        "Attempt failed"
                    );
                    let connectivity = err.is_connectivity();
                    trail.push(AttemptRecord {
                        endpoint: endpoint.base_url().to_string(),
                        error: err.to_string(),
                        duration: started.elapsed(),
                    });

                    if connectivity {
                        cursor += 1;
                    } else if attempt < policy.max_retries {
                        let delay = calculate_backoff(
                            attempt,
                            policy.base_delay_ms,
                            policy.backoff_multiplier,
                            policy.max_delay_ms,
                        );
                        tracing::debug!(service = %name, delay = ?delay, "Backing off before retry");
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(CallError::ExhaustedRetries {
            service: name.clone(),
            trail,
        })
    }

    async fn send_once(
        &self,
        endpoint: &ServiceEndpoint,
        path: &str,
        options: &CallOptions,
        timeout: Duration,
    ) -> Result<ServiceResponse, CallError> {
        let request = TransportRequest {
            method: options.method.clone(),
            url: endpoint.url_for(path),
            headers: options.headers.clone(),
            body: options.body.clone(),
        };

        match tokio::time::timeout(timeout, self.transport.send(request)).await {
            Err(_) => Err(CallError::Timeout {
                endpoint: endpoint.base_url().to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
            Ok(Err(e)) => Err(CallError::Connectivity {
                endpoint: endpoint.base_url().to_string(),
                message: e.to_string(),
            }),
            Ok(Ok(response)) if !response.status.is_success() => Err(CallError::Http {
                endpoint: endpoint.base_url().to_string(),
                status: response.status,
            }),
            Ok(Ok(response)) => Ok(ServiceResponse {
                status: response.status,
                headers: response.headers,
                body: response.body,
            }),
        }
    }
}
