//! Resilient inter-service client for the sample-tracking backend.
//!
//! # Architecture Overview
//!
//! ```text
//!  handler code                    ┌──────────────────────────────────────┐
//!  ────────────────────────────── ▶│            ServiceClient             │
//!   call(service, path, options)   │                                      │
//!                                  │  ┌────────────┐   gate   ┌─────────┐ │
//!                                  │  │  circuit   │◀────────▶│  retry  │ │
//!                                  │  │  breaker   │  outcome │ executor│ │
//!                                  │  └────────────┘          └────┬────┘ │
//!                                  │                               │      │
//!                                  │  ┌────────────┐          ┌────▼────┐ │
//!                                  │  │  endpoint  │─────────▶│transport│─┼──▶ services
//!                                  │  │  resolver  │candidates└─────────┘ │
//!                                  │  └────────────┘                      │
//!                                  │                                      │
//!                                  │  ┌────────────────────────────────┐  │
//!                                  │  │ health monitor (periodic, own  │  │
//!                                  │  │ ticker, independent of breaker)│  │
//!                                  │  └────────────────────────────────┘  │
//!                                  └──────────────────────────────────────┘
//! ```

// Core subsystems
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod transport;

// Traffic protection
pub mod resilience;

// Cross-cutting concerns
pub mod health;
pub mod lifecycle;
pub mod observability;

pub use client::{CallOptions, ServiceClient, ServiceResponse};
pub use config::{ClientConfig, ServiceConfig};
pub use error::{AttemptRecord, CallError, CallResult};
pub use health::{ServiceHealth, StatusSummary};
pub use lifecycle::Shutdown;
pub use resilience::CircuitState;
