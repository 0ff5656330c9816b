//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Spawn backend → Probe readiness → Build ReadinessGate + JobHandler
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop job API → Kill backend → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Startup is sequential and blocking: no job is accepted before the gate
//!   is decided
//! - Spawn failure is fatal; readiness failure only closes the gate

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{initialize, StartupError, Worker};
