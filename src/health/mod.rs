//! Backend readiness subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (once per worker):
//!     readiness.rs probes GET /health with bounded retries
//!     → bool
//!     → gate.rs (ReadinessGate, immutable)
//!
//! Per job:
//!     JobHandler reads ReadinessGate::is_open()
//!     → closed: fixed error result, no network call
//!     → open: forward to the request translator
//! ```
//!
//! # Design Decisions
//! - Once closed, closed for the process lifetime
//! - Single writer (startup) happens-before every reader

pub mod gate;
pub mod readiness;

pub use gate::ReadinessGate;
pub use readiness::ReadinessProber;
