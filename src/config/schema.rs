//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.
//! Defaults mirror the deployed service catalog, so `ClientConfig::default()`
//! talks to the same six services the production gateway does.

use serde::{Deserialize, Serialize};

/// Root configuration for the inter-service client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Downstream service definitions.
    pub services: Vec<ServiceConfig>,

    /// Health monitor settings.
    pub health_check: HealthCheckConfig,
}

/// Wire protocol used to reach a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Http,
    Https,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Https => write!(f, "https"),
        }
    }
}

/// One downstream service and how to reach it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Logical service name, e.g. "sample-management".
    pub name: String,

    /// Primary hostname (cluster DNS name).
    pub hostname: String,

    /// Fallback hostnames tried in order after the primary. Entries may
    /// carry an explicit `host:port` authority; bare hostnames reuse the
    /// service port.
    #[serde(default)]
    pub alt_hostnames: Vec<String>,

    /// Optional raw IP fallback, tried last.
    #[serde(default)]
    pub ip: Option<String>,

    /// Service port shared by all candidates without an explicit override.
    pub port: u16,

    /// Wire protocol (default: http).
    #[serde(default)]
    pub protocol: Protocol,

    /// Path probed by health checks.
    #[serde(default = "default_health_path")]
    pub health_path: String,

    /// Per-attempt request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retry behavior for calls to this service.
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Circuit breaker thresholds for this service.
    #[serde(default)]
    pub breaker: BreakerConfig,
}

fn default_health_path() -> String {
    "/health".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum number of attempts across all candidate endpoints.
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Multiplier applied per attempt.
    pub backoff_multiplier: u32,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            backoff_multiplier: 2,
            max_delay_ms: 2000,
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Consecutive logical-call failures before the circuit opens.
    pub failure_threshold: u32,

    /// How long the circuit stays open before admitting a trial call,
    /// in milliseconds.
    pub reset_timeout_ms: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout_ms: 30_000,
        }
    }
}

/// Health monitor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Enable the periodic health monitor.
    pub enabled: bool,

    /// Probe interval in milliseconds.
    pub interval_ms: u64,

    /// Per-probe timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 30_000,
            timeout_ms: 5_000,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            services: vec![
                known_service("sample-management", 8001),
                known_service("ai-processing", 8002),
                known_service("authentication", 8003),
                known_service("file-storage", 8004),
                known_service("audit", 8005),
                known_service("submission", 8006),
            ],
            health_check: HealthCheckConfig::default(),
        }
    }
}

/// A catalog entry with production defaults: the service answers on its
/// cluster DNS name at a fixed port.
fn known_service(name: &str, port: u16) -> ServiceConfig {
    ServiceConfig {
        name: name.to_string(),
        hostname: name.to_string(),
        alt_hostnames: Vec::new(),
        ip: None,
        port,
        protocol: Protocol::Http,
        health_path: default_health_path(),
        timeout_ms: default_timeout_ms(),
        retry: RetryPolicy::default(),
        breaker: BreakerConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let config = ClientConfig::default();
        assert_eq!(config.services.len(), 6);

        let audit = config.services.iter().find(|s| s.name == "audit").unwrap();
        assert_eq!(audit.port, 8005);
        assert_eq!(audit.health_path, "/health");
        assert_eq!(audit.timeout_ms, 10_000);
        assert_eq!(audit.retry.max_retries, 3);
        assert_eq!(audit.breaker.failure_threshold, 5);
    }

    #[test]
    fn test_toml_round_trip_with_defaults() {
        let toml = r#"
            [[services]]
            name = "audit"
            hostname = "audit.tracking.svc.cluster.local"
            alt_hostnames = ["audit"]
            ip = "10.96.14.5"
            port = 8005

            [health_check]
            interval_ms = 5000
        "#;

        let config: ClientConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.services.len(), 1);

        let svc = &config.services[0];
        assert_eq!(svc.protocol, Protocol::Http);
        assert_eq!(svc.alt_hostnames, vec!["audit".to_string()]);
        assert_eq!(svc.retry.backoff_multiplier, 2);
        assert_eq!(config.health_check.interval_ms, 5000);
        assert_eq!(config.health_check.timeout_ms, 5000);
    }
}
