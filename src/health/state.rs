//! Observable health state per service.
//!
//! # Design Decisions
//! - Entries are created lazily by the first completed probe and then
//!   overwritten atomically on every cycle, never deleted
//! - Only the monitor writes entries; everything else reads snapshots
//! - Timestamps are unix epoch milliseconds so the summary serializes
//!   without a date dependency

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use serde::Serialize;

/// Result of the most recent health probe for one service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    /// Whether the last probe saw a 2xx.
    pub healthy: bool,
    /// When the probe completed, unix epoch milliseconds.
    pub last_check_ms: u64,
    /// Probe latency in milliseconds.
    pub response_time_ms: u64,
    /// Failure description when unhealthy.
    pub error: Option<String>,
}

impl ServiceHealth {
    pub fn up(response_time: Duration) -> Self {
        Self {
            healthy: true,
            last_check_ms: now_unix_ms(),
            response_time_ms: response_time.as_millis() as u64,
            error: None,
        }
    }

    pub fn down(response_time: Duration, error: impl Into<String>) -> Self {
        Self {
            healthy: false,
            last_check_ms: now_unix_ms(),
            response_time_ms: response_time.as_millis() as u64,
            error: Some(error.into()),
        }
    }
}

/// Aggregate health document, the shape served to readiness and
/// diagnostics endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSummary {
    pub timestamp_ms: u64,
    pub total_services: usize,
    pub healthy_services: usize,
    pub services: BTreeMap<String, ServiceHealth>,
}

/// Shared health map: written by the monitor, read by everyone else.
#[derive(Debug, Default)]
pub struct HealthRegistry {
    entries: DashMap<String, ServiceHealth>,
}

impl HealthRegistry {
    /// Overwrite a service's entry with the latest probe result.
    /// Monitor-only; nothing else may write the registry.
    pub(crate) fn record(&self, service: &str, health: ServiceHealth) {
        self.entries.insert(service.to_string(), health);
    }

    /// Snapshot of one service's last probe, if any probe has completed.
    pub fn get(&self, service: &str) -> Option<ServiceHealth> {
        self.entries.get(service).map(|e| e.value().clone())
    }

    /// Aggregate snapshot across all probed services.
    ///
    /// `total_configured` counts configured services, which may exceed the
    /// entries present before their first probe completes.
    pub fn summary(&self, total_configured: usize) -> StatusSummary {
        let services: BTreeMap<String, ServiceHealth> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        let healthy_services = services.values().filter(|h| h.healthy).count();

        StatusSummary {
            timestamp_ms: now_unix_ms(),
            total_services: total_configured,
            healthy_services,
            services,
        }
    }
}

fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
