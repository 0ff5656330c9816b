//! HTTP subsystem: outbound translation and the local job API.
//!
//! # Data Flow
//! ```text
//! JobInput
//!     → request.rs (RequestKind decision table, URL/headers/query)
//!     → translator.rs (optional file download, one backend request)
//!     → response.rs (status check, content-type shaping)
//!     → error.rs (failure taxonomy → JobError)
//!     → JobResult
//!
//! server.rs exposes JobHandler over POST /runsync.
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod server;
pub mod translator;

pub use error::ProxyError;
pub use request::{OutboundRequest, RequestKind};
pub use server::JobServer;
pub use translator::{ProxyTimeouts, RequestTranslator};
