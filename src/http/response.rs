//! Backend response to job output.
//!
//! # Responsibilities
//! - Reject non-2xx responses as `ProxyError::Status`
//! - Shape the body by declared content type
//!
//! # Design Decisions
//! - Case-insensitive substring match, in order: json, audio, text, binary
//! - JSON passes through untouched; audio and binary travel as base64

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use reqwest::Response;

use crate::http::error::ProxyError;
use crate::job::{JobOutput, SuccessStatus};

/// How a response body is carried back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    Audio,
    Text,
    Binary,
}

impl ContentKind {
    pub fn from_content_type(content_type: &str) -> Self {
        let content_type = content_type.to_ascii_lowercase();
        if content_type.contains("application/json") {
            ContentKind::Json
        } else if content_type.contains("audio") {
            ContentKind::Audio
        } else if content_type.contains("text") {
            ContentKind::Text
        } else {
            ContentKind::Binary
        }
    }
}

/// Turn a non-2xx response into an error carrying its status and body.
pub async fn ensure_success(response: Response) -> Result<Response, ProxyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(status = %status, error = %e, "Failed to read backend error body");
            String::new()
        }
    };
    Err(ProxyError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Read a successful response into the job output.
pub async fn into_output(response: Response) -> Result<JobOutput, ProxyError> {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    if ContentKind::from_content_type(&content_type) == ContentKind::Text {
        // reqwest decodes using the declared charset, UTF-8 when absent.
        return Ok(JobOutput::Text {
            text: response.text().await?,
        });
    }
    let body = response.bytes().await?;
    decode_body(&content_type, &body)
}

/// Shape raw response bytes according to their content type.
///
/// Text bodies are read as UTF-8 here; `into_output` honours other charsets.
pub fn decode_body(content_type: &str, body: &[u8]) -> Result<JobOutput, ProxyError> {
    let output = match ContentKind::from_content_type(content_type) {
        ContentKind::Json => JobOutput::Json(serde_json::from_slice(body).map_err(|e| {
            ProxyError::Transport(format!("error decoding response body: {}", e))
        })?),
        ContentKind::Audio => JobOutput::Audio {
            status: SuccessStatus::Success,
            content_type: content_type.to_ascii_lowercase(),
            audio_content: STANDARD.encode(body),
        },
        ContentKind::Text => JobOutput::Text {
            text: String::from_utf8_lossy(body).into_owned(),
        },
        ContentKind::Binary => JobOutput::Binary {
            status: SuccessStatus::Success,
            content_type: content_type.to_ascii_lowercase(),
            data: STANDARD.encode(body),
        },
    };
    Ok(output)
}
