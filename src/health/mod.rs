//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! monitor.rs:
//!     Periodic ticker
//!     → one probe task per service, all concurrent
//!     → GET {endpoint}{health_path}, 2xx = healthy
//!     → overwrite that service's entry in state.rs
//!
//! state.rs:
//!     ServiceHealth snapshots + aggregate StatusSummary
//!     read-only outside the monitor
//! ```
//!
//! # Design Decisions
//! - Monitor state is independent of the breaker's live-traffic view
//! - Probe failures are data, not errors; the ticking loop never throws
//! - Entries appear on first completed probe and are never deleted

pub mod monitor;
pub mod state;

pub use monitor::HealthMonitor;
pub use state::{HealthRegistry, ServiceHealth, StatusSummary};
