//! Job result payloads.
//!
//! The invocation channel is JSON-only, so every result serializes to a JSON
//! object (or the backend's own JSON value for pass-through responses).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed message returned when the backend never became ready.
pub const NOT_READY_MESSAGE: &str = "Server is not running or failed to start.";

/// Framework-level job outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Completed,
    Failed,
}

/// Response envelope of the local job API: `{ "id", "status", "output" }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobResponse {
    pub id: String,
    pub status: JobStatus,
    pub output: JobResult,
}

impl JobResponse {
    pub fn new(id: String, output: JobResult) -> Self {
        let status = if output.is_error() {
            JobStatus::Failed
        } else {
            JobStatus::Completed
        };
        Self { id, status, output }
    }
}

/// Exactly one of these is produced per job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JobResult {
    Success(JobOutput),
    Error { error: JobError },
}

impl JobResult {
    pub fn error(error: JobError) -> Self {
        JobResult::Error { error }
    }

    /// The short-circuit result of a closed readiness gate.
    pub fn not_ready() -> Self {
        JobResult::error(JobError::new(NOT_READY_MESSAGE))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, JobResult::Error { .. })
    }
}

impl From<JobOutput> for JobResult {
    fn from(output: JobOutput) -> Self {
        JobResult::Success(output)
    }
}

/// Successful payload, shaped by the backend response's content type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JobOutput {
    /// Backend JSON, passed through unchanged.
    Json(Value),
    Audio {
        status: SuccessStatus,
        content_type: String,
        /// Base64 of the response bytes.
        audio_content: String,
    },
    Text {
        text: String,
    },
    Binary {
        status: SuccessStatus,
        content_type: String,
        /// Base64 of the response bytes.
        data: String,
    },
}

/// Serializes as `"success"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuccessStatus {
    Success,
}

/// Caller-facing error. Never carries stack traces or internal paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobError {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl JobError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
            status_code: None,
        }
    }
}
