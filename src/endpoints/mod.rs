//! Endpoint candidates for the configured services.
//!
//! # Data Flow
//! ```text
//! ServiceConfig (hostname, alt_hostnames, ip, port, protocol)
//!     → resolver.rs (assemble ordered candidate list at startup)
//!     → immutable ServiceEndpoint values, referenced for process lifetime
//! ```
//!
//! # Design Decisions
//! - Candidates are fully resolved and validated once, then never mutated
//! - Order is significant: cluster DNS name, short names, raw IP last
//! - Base URLs are pre-built so the request path never re-parses config

pub mod resolver;

pub use resolver::{EndpointResolver, ResolvedService};

use crate::config::Protocol;

/// A single network address for a logical service.
///
/// Immutable; constructed once from configuration and referenced thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    /// Hostname or IP literal.
    pub hostname: String,
    /// Port the service answers on.
    pub port: u16,
    /// Wire protocol.
    pub protocol: Protocol,
    /// Pre-built `protocol://hostname:port`.
    base_url: String,
}

impl ServiceEndpoint {
    pub fn new(hostname: impl Into<String>, port: u16, protocol: Protocol) -> Self {
        let hostname = hostname.into();
        let base_url = format!("{}://{}:{}", protocol, hostname, port);
        Self {
            hostname,
            port,
            protocol,
            base_url,
        }
    }

    /// Base URL without a trailing slash, e.g. `http://audit:8005`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a request path (path must start with '/').
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl std::fmt::Display for ServiceEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.base_url)
    }
}
