//! Periodic health monitoring.
//!
//! # Responsibilities
//! - Probe every configured service's health path on a fixed interval
//! - Launch all probes concurrently; one slow probe never delays another
//! - Capture probe failures into the registry, never propagate them
//!
//! # Design Decisions
//! - Probes walk the service's candidate list like live traffic does and
//!   mark the service healthy on the first 2xx
//! - Each probe runs in its own task bounded by the probe timeout and the
//!   shutdown signal, so teardown is deterministic
//! - The monitor's view is independent of the circuit breaker's
//!   live-traffic-driven state

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use http::header::USER_AGENT;
use http::HeaderValue;
use tokio::time::Instant;

use crate::config::HealthCheckConfig;
use crate::endpoints::{EndpointResolver, ResolvedService};
use crate::health::state::{HealthRegistry, ServiceHealth};
use crate::lifecycle::Shutdown;
use crate::observability::metrics::record_service_health;
use crate::transport::{Transport, TransportRequest};

const PROBE_USER_AGENT: &str = "service-client-health";

/// Background prober maintaining the shared [`HealthRegistry`].
#[derive(Debug)]
pub struct HealthMonitor<T> {
    resolver: Arc<EndpointResolver>,
    registry: Arc<HealthRegistry>,
    transport: T,
    config: HealthCheckConfig,
    shutdown: Shutdown,
    started: AtomicBool,
}

impl<T> HealthMonitor<T>
where
    T: Transport + Clone + Send + Sync + 'static,
{
    pub fn new(
        resolver: Arc<EndpointResolver>,
        registry: Arc<HealthRegistry>,
        transport: T,
        config: HealthCheckConfig,
    ) -> Self {
        Self {
            resolver,
            registry,
            transport,
            config,
            shutdown: Shutdown::new(),
            started: AtomicBool::new(false),
        }
    }

    /// Spawn the ticking task. A second call is a no-op.
    pub fn start(&self) {
        if !self.config.enabled {
            tracing::info!("Health monitor disabled");
            return;
        }
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }

        tracing::info!(
            interval_ms = self.config.interval_ms,
            timeout_ms = self.config.timeout_ms,
            services = self.resolver.len(),
            "Health monitor starting"
        );

        let resolver = self.resolver.clone();
        let registry = self.registry.clone();
        let transport = self.transport.clone();
        let config = self.config.clone();
        let shutdown = self.shutdown.clone();
        let mut signal = self.shutdown.subscribe();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(config.interval_ms));
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        check_all(&resolver, &registry, &transport, &config, &shutdown);
                    }
                    _ = signal.recv() => {
                        tracing::info!("Health monitor stopping");
                        break;
                    }
                }
            }
        });
    }

    /// Cancel the ticking task and any in-flight probes. Idempotent and
    /// safe to call during shutdown.
    pub fn stop(&self) {
        self.shutdown.trigger();
    }

    /// Last completed probe for a service, if any.
    pub fn health_of(&self, service: &str) -> Option<ServiceHealth> {
        self.registry.get(service)
    }
}

impl<T> Drop for HealthMonitor<T> {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Launch one probe task per service; results land in the registry as each
/// probe completes.
fn check_all<T>(
    resolver: &Arc<EndpointResolver>,
    registry: &Arc<HealthRegistry>,
    transport: &T,
    config: &HealthCheckConfig,
    shutdown: &Shutdown,
) where
    T: Transport + Clone + Send + Sync + 'static,
{
    let timeout = Duration::from_millis(config.timeout_ms);

    for name in resolver.names() {
        let name = name.to_string();
        let resolver = resolver.clone();
        let registry = registry.clone();
        let transport = transport.clone();
        let mut signal = shutdown.subscribe();

        tokio::spawn(async move {
            let Some(service) = resolver.service(&name) else {
                return;
            };
            tokio::select! {
                health = probe_service(service, &transport, timeout) => {
                    record_service_health(&name, health.healthy);
                    registry.record(&name, health);
                }
                _ = signal.recv() => {}
            }
        });
    }
}

/// Probe a service's health path, walking its candidates in order.
///
/// Shared by the monitor and the one-shot connectivity check; never writes
/// the registry itself.
pub(crate) async fn probe_service<T: Transport>(
    service: &ResolvedService,
    transport: &T,
    timeout: Duration,
) -> ServiceHealth {
    let name = &service.config.name;
    let path = &service.config.health_path;

    let mut last_error = String::from("no endpoints");
    let mut last_elapsed = Duration::ZERO;

    for endpoint in &service.candidates {
        let mut request = TransportRequest::get(endpoint.url_for(path));
        request
            .headers
            .insert(USER_AGENT, HeaderValue::from_static(PROBE_USER_AGENT));

        let started = Instant::now();
        let outcome = tokio::time::timeout(timeout, transport.send(request)).await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(Ok(response)) if response.status.is_success() => {
                tracing::debug!(service = %name, endpoint = %endpoint, latency = ?elapsed, "Health probe succeeded");
                return ServiceHealth::up(elapsed);
            }
            Ok(Ok(response)) => {
                tracing::warn!(service = %name, endpoint = %endpoint, status = %response.status, "Health probe failed: non-success status");
                last_error = format!("HTTP {}", response.status);
            }
            Ok(Err(e)) => {
                tracing::warn!(service = %name, endpoint = %endpoint, error = %e, "Health probe failed: connection error");
                last_error = e.to_string();
            }
            Err(_) => {
                tracing::warn!(service = %name, endpoint = %endpoint, "Health probe failed: timeout");
                last_error = format!("timeout after {}ms", timeout.as_millis());
            }
        }
        last_elapsed = elapsed;
    }

    ServiceHealth::down(last_elapsed, last_error)
}
