//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Validate → Resolve endpoints → Build client
//!     → start health monitor
//!
//! Shutdown:
//!     Signal received → monitor ticker exits → in-flight probes cancelled
//! ```
//!
//! # Design Decisions
//! - Shutdown is a broadcast: one trigger, every task observes it
//! - Dropping the client also triggers it, so tests never leak timers

pub mod shutdown;

pub use shutdown::Shutdown;
