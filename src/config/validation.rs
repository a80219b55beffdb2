//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check value ranges (ports, timeouts, retry and breaker thresholds)
//! - Check endpoint candidates parse (alt authorities, IP fallbacks)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ClientConfig -> Result<(), Vec<ValidationError>>
//! - Runs before a config is accepted into the system

use std::collections::HashSet;
use std::net::IpAddr;

use thiserror::Error;

use crate::config::schema::{ClientConfig, ServiceConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no services configured")]
    NoServices,

    #[error("duplicate service name '{0}'")]
    DuplicateService(String),

    #[error("service '{0}': empty hostname")]
    EmptyHostname(String),

    #[error("service '{0}': port must be non-zero")]
    InvalidPort(String),

    #[error("service '{service}': alternate hostname '{value}' is not a hostname or host:port")]
    InvalidAltHostname { service: String, value: String },

    #[error("service '{service}': '{value}' is not a valid IP address")]
    InvalidIp { service: String, value: String },

    #[error("service '{0}': health path must start with '/'")]
    InvalidHealthPath(String),

    #[error("service '{0}': timeout_ms must be non-zero")]
    ZeroTimeout(String),

    #[error("service '{0}': retry.max_retries must be at least 1")]
    ZeroRetries(String),

    #[error("service '{0}': breaker.failure_threshold must be at least 1")]
    ZeroFailureThreshold(String),

    #[error("health_check.interval_ms must be non-zero")]
    ZeroHealthInterval,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.services.is_empty() {
        errors.push(ValidationError::NoServices);
    }

    let mut seen = HashSet::new();
    for service in &config.services {
        if !seen.insert(service.name.as_str()) {
            errors.push(ValidationError::DuplicateService(service.name.clone()));
        }
        validate_service(service, &mut errors);
    }

    if config.health_check.interval_ms == 0 {
        errors.push(ValidationError::ZeroHealthInterval);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_service(service: &ServiceConfig, errors: &mut Vec<ValidationError>) {
    let name = service.name.clone();

    if service.hostname.trim().is_empty() {
        errors.push(ValidationError::EmptyHostname(name.clone()));
    }
    if service.port == 0 {
        errors.push(ValidationError::InvalidPort(name.clone()));
    }
    if !service.health_path.starts_with('/') {
        errors.push(ValidationError::InvalidHealthPath(name.clone()));
    }
    if service.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout(name.clone()));
    }
    if service.retry.max_retries == 0 {
        errors.push(ValidationError::ZeroRetries(name.clone()));
    }
    if service.breaker.failure_threshold == 0 {
        errors.push(ValidationError::ZeroFailureThreshold(name.clone()));
    }

    for alt in &service.alt_hostnames {
        if !alt_hostname_is_valid(alt) {
            errors.push(ValidationError::InvalidAltHostname {
                service: name.clone(),
                value: alt.clone(),
            });
        }
    }

    if let Some(ip) = &service.ip {
        if ip.parse::<IpAddr>().is_err() {
            errors.push(ValidationError::InvalidIp {
                service: name.clone(),
                value: ip.clone(),
            });
        }
    }
}

fn alt_hostname_is_valid(alt: &str) -> bool {
    match alt.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().map_or(false, |p| p != 0),
        None => !alt.trim().is_empty(),
    }
}
