//! Endpoint fallback and retry timing against real sockets.

use std::time::{Duration, Instant};

use service_client::config::{ClientConfig, HealthCheckConfig};
use service_client::{CallError, CallOptions, ServiceClient};

mod common;

fn config_for(services: Vec<service_client::ServiceConfig>) -> ClientConfig {
    ClientConfig {
        services,
        health_check: HealthCheckConfig {
            enabled: false,
            ..Default::default()
        },
    }
}

#[tokio::test]
async fn test_dead_primary_falls_through_without_backoff() {
    let live = common::start_mock_backend("pong").await;
    let dead = common::refused_addr();

    let mut entry = common::service_entry("audit", dead, &[live]);
    // a fallback after a connect failure must not wait out a backoff
    entry.retry.base_delay_ms = 500;
    let client = ServiceClient::new(config_for(vec![entry]));

    let started = Instant::now();
    let response = client
        .call("audit", "/api/v1/events", CallOptions::get())
        .await
        .expect("fallback endpoint should answer");

    assert_eq!(response.status, 200);
    assert_eq!(response.body.as_ref(), b"pong");
    assert!(
        started.elapsed() < Duration::from_millis(400),
        "no backoff may be inserted between candidates, took {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_persistent_500s_exhaust_with_full_trail() {
    let backend = common::start_programmable_backend(|| async { (500, "boom".into()) }).await;

    let entry = common::service_entry("submission", backend, &[]);
    let client = ServiceClient::new(config_for(vec![entry]));

    let started = Instant::now();
    let err = client
        .call("submission", "/api/v1/submissions", CallOptions::get())
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    // backoff of 100ms + 200ms sits between the three attempts
    assert!(elapsed >= Duration::from_millis(300), "took {elapsed:?}");
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");

    match err {
        CallError::ExhaustedRetries { service, trail } => {
            assert_eq!(service, "submission");
            assert_eq!(trail.len(), 3);
            for attempt in &trail {
                assert!(attempt.error.contains("HTTP 500"), "got {}", attempt.error);
                assert!(attempt.endpoint.starts_with("http://127.0.0.1:"));
            }
        }
        other => panic!("expected ExhaustedRetries, got {other}"),
    }
}

#[tokio::test]
async fn test_unknown_service_never_touches_the_network() {
    let client = ServiceClient::new(config_for(vec![]));
    let err = client
        .call("samples", "/api/v1/samples", CallOptions::get())
        .await
        .unwrap_err();
    assert!(matches!(err, CallError::UnknownService(name) if name == "samples"));
}
