//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events, one span per job)
//!     → metrics.rs (job outcomes, durations, backend readiness)
//!
//! Consumers:
//!     → stdout (worker logs)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
