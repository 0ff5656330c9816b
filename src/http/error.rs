//! Per-job failure taxonomy and its mapping to caller-facing errors.
//!
//! # Design Decisions
//! - Every per-job failure ends up here; nothing escapes the handler
//! - Full detail goes to the log, only message/details/status reach the caller
//! - Unexpected (non-transport) failures log at a higher severity

use thiserror::Error;

use crate::job::{JobError, JobResult};
use crate::observability::metrics;

/// Failures while forwarding a single job.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Backend (or file host) answered with a non-2xx status.
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// A request exceeded its timeout.
    #[error("timed out: {0}")]
    Timeout(String),

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other transport-level failure (invalid URL, reset, decode).
    #[error("{0}")]
    Transport(String),

    /// Anything that is not a transport failure.
    #[error("{0}")]
    Unexpected(String),
}

impl ProxyError {
    /// Metric label for this failure.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::Status { .. } => "backend_status",
            ProxyError::Timeout(_) => "timeout",
            ProxyError::Connect(_) => "connect",
            ProxyError::Transport(_) => "transport",
            ProxyError::Unexpected(_) => "unexpected",
        }
    }

    /// Caller-facing shape of this failure.
    pub fn to_job_error(&self) -> JobError {
        match self {
            ProxyError::Status { status, body } => JobError {
                message: format!("Request to backend server failed with status {}", status),
                details: Some(body.clone()),
                status_code: Some(*status),
            },
            ProxyError::Timeout(_) => JobError::new("Request to backend server timed out"),
            ProxyError::Connect(_) => JobError::new("Failed to connect to backend server"),
            ProxyError::Transport(cause) => {
                JobError::new(format!("Request to backend server failed: {}", cause))
            }
            ProxyError::Unexpected(cause) => {
                JobError::new(format!("Unexpected error occurred: {}", cause))
            }
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        let cause = error_chain(&e);
        // Connect timeouts report both; timeout wins.
        if e.is_timeout() {
            ProxyError::Timeout(cause)
        } else if e.is_connect() {
            ProxyError::Connect(cause)
        } else {
            ProxyError::Transport(cause)
        }
    }
}

/// Log a failure and convert it into the job's error result.
pub fn classify(error: ProxyError) -> JobResult {
    match &error {
        ProxyError::Status { status, body } => {
            tracing::warn!(status, body = %body, "Backend returned error status");
        }
        ProxyError::Timeout(cause) => tracing::warn!(error = %cause, "Request timeout"),
        ProxyError::Connect(cause) => tracing::warn!(error = %cause, "Connection error"),
        ProxyError::Transport(cause) => tracing::warn!(error = %cause, "Request failed"),
        ProxyError::Unexpected(cause) => tracing::error!(error = %cause, "Unexpected error"),
    }
    metrics::record_outcome(error.kind());
    JobResult::error(error.to_job_error())
}

/// `Display` of an error followed by its sources.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}
