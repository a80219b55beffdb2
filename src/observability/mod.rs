//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields, correlation IDs)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//!     → Whatever metrics exporter the embedding process installs
//! ```
//!
//! # Design Decisions
//! - The library never initializes a subscriber or exporter
//! - Correlation IDs flow through outbound request headers
//! - Metric updates are cheap enough for the request path

pub mod metrics;
