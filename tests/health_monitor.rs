//! Health monitor behavior against real sockets.

use std::time::Duration;

use service_client::config::{ClientConfig, HealthCheckConfig};
use service_client::ServiceClient;

mod common;

#[tokio::test]
async fn test_hanging_probe_does_not_block_other_services() {
    let fast = common::start_mock_backend("ok").await;
    let slow = common::start_silent_backend().await;

    let client = ServiceClient::new(ClientConfig {
        services: vec![
            common::service_entry("sample-management", fast, &[]),
            common::service_entry("ai-processing", slow, &[]),
        ],
        health_check: HealthCheckConfig {
            enabled: true,
            interval_ms: 150,
            // far beyond the test duration, so the slow probe truly hangs
            timeout_ms: 10_000,
        },
    });
    client.start_health_monitor();

    tokio::time::sleep(Duration::from_millis(400)).await;

    let fast_health = client
        .health_of("sample-management")
        .expect("fast service must have been probed");
    assert!(fast_health.healthy);
    let first_check = fast_health.last_check_ms;

    // the hanging probe has never completed, so no entry exists
    assert!(client.health_of("ai-processing").is_none());

    // and the fast service keeps updating on schedule regardless
    tokio::time::sleep(Duration::from_millis(400)).await;
    let later = client.health_of("sample-management").unwrap();
    assert!(later.last_check_ms > first_check);

    client.stop_health_monitor();
}

#[tokio::test]
async fn test_unhealthy_probe_results_are_captured() {
    let failing = common::start_programmable_backend(|| async { (500, "err".into()) }).await;

    let client = ServiceClient::new(ClientConfig {
        services: vec![common::service_entry("audit", failing, &[])],
        health_check: HealthCheckConfig {
            enabled: true,
            interval_ms: 100,
            timeout_ms: 1000,
        },
    });
    client.start_health_monitor();

    tokio::time::sleep(Duration::from_millis(300)).await;

    let health = client.health_of("audit").expect("probe should have run");
    assert!(!health.healthy);
    assert!(health.error.unwrap().contains("HTTP 500"));

    let summary = client.status_summary();
    assert_eq!(summary.total_services, 1);
    assert_eq!(summary.healthy_services, 0);
    assert_eq!(summary.services.len(), 1);

    client.stop_health_monitor();
}

#[tokio::test]
async fn test_stop_halts_probing_and_is_idempotent() {
    let fast = common::start_mock_backend("ok").await;

    let client = ServiceClient::new(ClientConfig {
        services: vec![common::service_entry("submission", fast, &[])],
        health_check: HealthCheckConfig {
            enabled: true,
            interval_ms: 100,
            timeout_ms: 1000,
        },
    });
    client.start_health_monitor();

    tokio::time::sleep(Duration::from_millis(250)).await;
    client.stop_health_monitor();
    // let any in-flight probe land before sampling
    tokio::time::sleep(Duration::from_millis(150)).await;

    let frozen = client.health_of("submission").unwrap().last_check_ms;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(client.health_of("submission").unwrap().last_check_ms, frozen);

    client.stop_health_monitor();
}

#[tokio::test]
async fn test_one_shot_connectivity_sweep() {
    let live = common::start_mock_backend("ok").await;
    let dead = common::refused_addr();

    let client = ServiceClient::new(ClientConfig {
        services: vec![
            common::service_entry("authentication", live, &[]),
            common::service_entry("file-storage", dead, &[]),
        ],
        health_check: HealthCheckConfig {
            enabled: true,
            interval_ms: 30_000,
            timeout_ms: 500,
        },
    });

    let map = client.test_connectivity().await;
    assert_eq!(map.len(), 2);
    assert!(map["authentication"]);
    assert!(!map["file-storage"]);

    // the sweep is independent of the monitor's registry
    assert!(client.health_of("authentication").is_none());
    assert!(client.health_of("file-storage").is_none());
}
