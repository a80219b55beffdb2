//! Service client façade.
//!
//! # Responsibilities
//! - Expose `call(service, path, options)` to route handlers
//! - Gate each call through the service's circuit breaker
//! - Run the retry executor across the service's endpoint candidates
//! - Feed the logical outcome back into the breaker
//! - Surface health diagnostics: last probe, aggregate summary, one-shot
//!   connectivity sweep
//!
//! # Design Decisions
//! - An explicit context object, constructed once from config and injected
//!   where needed; tests build independent instances freely
//! - Outbound requests carry an `x-correlation-id` header so downstream
//!   logs line up with the caller's

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::endpoints::EndpointResolver;
use crate::error::{CallError, CallResult};
use crate::health::monitor::probe_service;
use crate::health::{HealthMonitor, HealthRegistry, ServiceHealth, StatusSummary};
use crate::observability::metrics::record_call;
use crate::resilience::{CircuitBreaker, CircuitState, RetryExecutor};
use crate::transport::{HyperTransport, Transport};

const CORRELATION_HEADER: &str = "x-correlation-id";

/// Options for one outbound call.
#[derive(Debug, Clone)]
pub struct CallOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CallOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn post(body: impl Into<Bytes>) -> Self {
        Self {
            method: Method::POST,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

impl Default for CallOptions {
    fn default() -> Self {
        Self::get()
    }
}

/// Response from a downstream service, body fully collected.
#[derive(Debug, Clone)]
pub struct ServiceResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Resilient client for the configured downstream services.
///
/// Composes endpoint resolution, per-service circuit breakers, bounded
/// retries with endpoint fallback, and a periodic health monitor.
pub struct ServiceClient<T = HyperTransport> {
    resolver: Arc<EndpointResolver>,
    breakers: HashMap<String, CircuitBreaker>,
    executor: RetryExecutor<T>,
    registry: Arc<HealthRegistry>,
    monitor: HealthMonitor<T>,
    transport: T,
    probe_timeout: Duration,
}

impl ServiceClient<HyperTransport> {
    /// Build a client over the pooled hyper transport.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, HyperTransport::new())
    }
}

impl<T> ServiceClient<T>
where
    T: Transport + Clone + Send + Sync + 'static,
{
    /// Build a client over a caller-supplied transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let resolver = Arc::new(EndpointResolver::from_config(&config));
        let breakers = resolver
            .services()
            .map(|s| {
                (
                    s.config.name.clone(),
                    CircuitBreaker::new(&s.config.name, &s.config.breaker),
                )
            })
            .collect();
        let registry = Arc::new(HealthRegistry::default());
        let monitor = HealthMonitor::new(
            resolver.clone(),
            registry.clone(),
            transport.clone(),
            config.health_check.clone(),
        );

        Self {
            resolver,
            breakers,
            executor: RetryExecutor::new(transport.clone()),
            registry,
            monitor,
            transport,
            probe_timeout: Duration::from_millis(config.health_check.timeout_ms),
        }
    }

    /// Call a downstream service.
    ///
    /// The breaker admits or rejects the call; inside, the retry executor
    /// walks the service's candidates. The whole walk is one logical
    /// success or failure as far as the breaker is concerned.
    pub async fn call(
        &self,
        service: &str,
        path: &str,
        options: CallOptions,
    ) -> CallResult<ServiceResponse> {
        let resolved = self
            .resolver
            .service(service)
            .ok_or_else(|| CallError::UnknownService(service.to_string()))?;
        let breaker = self
            .breakers
            .get(service)
            .ok_or_else(|| CallError::UnknownService(service.to_string()))?;

        let mut options = options;
        ensure_correlation_id(&mut options.headers);

        let started = tokio::time::Instant::now();
        let result = breaker
            .execute(|| self.executor.attempt(resolved, path, &options))
            .await;

        match &result {
            Ok(response) => {
                record_call(service, "success", started.elapsed());
                tracing::debug!(service, path, status = %response.status, "Call completed");
            }
            Err(err) => {
                record_call(service, err.kind(), started.elapsed());
                tracing::warn!(service, path, error = %err, "Call failed");
            }
        }
        result
    }

    /// Start the periodic health monitor. A second call is a no-op.
    pub fn start_health_monitor(&self) {
        self.monitor.start();
    }

    /// Stop the health monitor. Idempotent; also runs on drop.
    pub fn stop_health_monitor(&self) {
        self.monitor.stop();
    }

    /// Last completed health probe for a service, if any.
    pub fn health_of(&self, service: &str) -> Option<ServiceHealth> {
        self.registry.get(service)
    }

    /// Current breaker state for a service.
    pub fn breaker_state(&self, service: &str) -> Option<CircuitState> {
        self.breakers.get(service).map(|b| b.state())
    }

    /// Aggregate health document across all services.
    pub fn status_summary(&self) -> StatusSummary {
        self.registry.summary(self.resolver.len())
    }

    /// One-shot connectivity probe of every configured service, all in
    /// parallel. Independent of the breaker and the monitor; does not touch
    /// the health registry.
    pub async fn test_connectivity(&self) -> HashMap<String, bool> {
        let probes = self.resolver.services().map(|service| async move {
            let health = probe_service(service, &self.transport, self.probe_timeout).await;
            (service.config.name.clone(), health.healthy)
        });
        futures_util::future::join_all(probes)
            .await
            .into_iter()
            .collect()
    }
}

fn ensure_correlation_id(headers: &mut HeaderMap) {
    if headers.contains_key(CORRELATION_HEADER) {
        return;
    }
    if let Ok(value) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
        headers.insert(CORRELATION_HEADER, value);
    }
}
