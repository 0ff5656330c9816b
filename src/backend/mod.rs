//! Backend process subsystem.
//!
//! # Data Flow
//! ```text
//! BackendConfig (host, port, command)
//!     → process.rs (spawn child, record PID)
//!     → endpoint.rs (BackendEndpoint, shared read-only by every job)
//! ```
//!
//! # Design Decisions
//! - One backend per worker, created once at startup
//! - Lifecycle only: this module never looks at request traffic

pub mod endpoint;
pub mod process;

pub use endpoint::BackendEndpoint;
pub use process::{BackendError, BackendProcess};
