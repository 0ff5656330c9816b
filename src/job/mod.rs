//! Job model and handler.
//!
//! # Data Flow
//! ```text
//! JobRequest { id?, input: JobInput }
//!     → handler.rs (readiness gate, then request translator)
//!     → JobResult (Success | Error)
//!     → JobResponse { id, status, output }
//! ```
//!
//! # Design Decisions
//! - Exactly one result per job; no cross-job state
//! - Failures are values, never panics or propagated errors

pub mod handler;
pub mod input;
pub mod result;

pub use handler::JobHandler;
pub use input::{JobInput, JobRequest};
pub use result::{JobError, JobOutput, JobResponse, JobResult, JobStatus, SuccessStatus, NOT_READY_MESSAGE};
