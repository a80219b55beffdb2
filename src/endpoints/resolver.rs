//! Candidate lookup for logical service names.
//!
//! # Responsibilities
//! - Assemble each service's ordered endpoint candidates from configuration
//! - Answer `candidates_for(service)` with no I/O and no mutable state

use std::collections::HashMap;

use url::Url;

use crate::config::{ClientConfig, ServiceConfig};
use crate::endpoints::ServiceEndpoint;

/// A service with its candidate endpoints assembled.
#[derive(Debug)]
pub struct ResolvedService {
    /// The service's configuration.
    pub config: ServiceConfig,
    /// Ordered endpoint candidates: primary hostname, alternates, IP last.
    pub candidates: Vec<ServiceEndpoint>,
}

/// Pure lookup from service name to endpoint candidates.
///
/// Built once at startup from a validated [`ClientConfig`]; read-only after.
#[derive(Debug)]
pub struct EndpointResolver {
    services: HashMap<String, ResolvedService>,
}

impl EndpointResolver {
    /// Assemble candidates for every configured service.
    ///
    /// Expects a config that already passed validation; anything that still
    /// fails to parse into a URL is skipped with a warning, the way an
    /// operator typo should degrade rather than abort.
    pub fn from_config(config: &ClientConfig) -> Self {
        let mut services = HashMap::new();

        for service in &config.services {
            let candidates = assemble_candidates(service);
            if candidates.is_empty() {
                tracing::warn!(service = %service.name, "No usable endpoints, service skipped");
                continue;
            }
            services.insert(
                service.name.clone(),
                ResolvedService {
                    config: service.clone(),
                    candidates,
                },
            );
        }

        Self { services }
    }

    /// Look up a service and its candidates.
    pub fn service(&self, name: &str) -> Option<&ResolvedService> {
        self.services.get(name)
    }

    /// Ordered endpoint candidates for a service.
    pub fn candidates_for(&self, name: &str) -> Option<&[ServiceEndpoint]> {
        self.services.get(name).map(|s| s.candidates.as_slice())
    }

    /// Iterate all resolved services.
    pub fn services(&self) -> impl Iterator<Item = &ResolvedService> {
        self.services.values()
    }

    /// Configured service names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

fn assemble_candidates(service: &ServiceConfig) -> Vec<ServiceEndpoint> {
    let mut candidates = Vec::with_capacity(2 + service.alt_hostnames.len());

    push_checked(
        &mut candidates,
        service,
        ServiceEndpoint::new(&service.hostname, service.port, service.protocol),
    );

    for alt in &service.alt_hostnames {
        // "host:port" pins an explicit port, a bare name reuses the service port
        let endpoint = match alt.rsplit_once(':').and_then(|(host, port)| {
            port.parse::<u16>().ok().map(|p| (host.to_string(), p))
        }) {
            Some((host, port)) => ServiceEndpoint::new(host, port, service.protocol),
            None => ServiceEndpoint::new(alt, service.port, service.protocol),
        };
        push_checked(&mut candidates, service, endpoint);
    }

    if let Some(ip) = &service.ip {
        push_checked(
            &mut candidates,
            service,
            ServiceEndpoint::new(ip, service.port, service.protocol),
        );
    }

    candidates
}

fn push_checked(
    candidates: &mut Vec<ServiceEndpoint>,
    service: &ServiceConfig,
    endpoint: ServiceEndpoint,
) {
    if Url::parse(endpoint.base_url()).is_ok() {
        candidates.push(endpoint);
    } else {
        tracing::warn!(
            service = %service.name,
            endpoint = %endpoint,
            "Invalid endpoint address, skipped"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Protocol;

    fn service_with_fallbacks() -> ClientConfig {
        let mut config = ClientConfig::default();
        let svc = &mut config.services[0];
        svc.name = "audit".into();
        svc.hostname = "audit.tracking.svc.cluster.local".into();
        svc.alt_hostnames = vec!["audit".into(), "audit-replica:9005".into()];
        svc.ip = Some("10.96.14.5".into());
        svc.port = 8005;
        config.services.truncate(1);
        config
    }

    #[test]
    fn test_candidate_order_and_ports() {
        let resolver = EndpointResolver::from_config(&service_with_fallbacks());
        let candidates = resolver.candidates_for("audit").unwrap();

        assert_eq!(candidates.len(), 4);
        assert_eq!(
            candidates[0].base_url(),
            "http://audit.tracking.svc.cluster.local:8005"
        );
        assert_eq!(candidates[1].base_url(), "http://audit:8005");
        assert_eq!(candidates[2].base_url(), "http://audit-replica:9005");
        assert_eq!(candidates[3].base_url(), "http://10.96.14.5:8005");
    }

    #[test]
    fn test_unknown_service_is_none() {
        let resolver = EndpointResolver::from_config(&ClientConfig::default());
        assert!(resolver.candidates_for("nonexistent").is_none());
        assert_eq!(resolver.len(), 6);
    }

    #[test]
    fn test_protocol_flows_into_candidates() {
        let mut config = service_with_fallbacks();
        config.services[0].protocol = Protocol::Https;
        let resolver = EndpointResolver::from_config(&config);
        let candidates = resolver.candidates_for("audit").unwrap();
        assert!(candidates[0].base_url().starts_with("https://"));
    }
}
