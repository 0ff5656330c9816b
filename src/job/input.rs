//! Inbound job envelope.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A job as submitted by the invocation framework: `{ "id"?, "input": {...} }`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JobRequest {
    /// Framework-assigned job id; generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub input: JobInput,
}

/// Description of the HTTP request to forward to the backend.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct JobInput {
    /// HTTP verb, case-insensitive.
    pub method: String,

    /// Backend path, e.g. `/v1/models`.
    pub path: String,

    pub headers: HashMap<String, String>,

    /// JSON body, or the extra form fields of a file upload.
    pub body: Value,

    /// Remote file to download and upload to the backend as multipart.
    pub file_url: Option<String>,

    pub query_params: HashMap<String, String>,
}

impl Default for JobInput {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            path: "/".to_string(),
            headers: HashMap::new(),
            body: Value::Null,
            file_url: None,
            query_params: HashMap::new(),
        }
    }
}

impl JobInput {
    /// Whether a body was supplied. `null`, `{}`, `[]` and `""` count as absent.
    pub fn has_body(&self) -> bool {
        match &self.body {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// The remote file URL, ignoring empty strings.
    pub fn file_url(&self) -> Option<&str> {
        self.file_url.as_deref().filter(|url| !url.is_empty())
    }
}
