//! Job-to-HTTP request translation.
//!
//! # Responsibilities
//! - Issue exactly one backend request per job (plus the file download for
//!   uploads)
//! - Convert the backend response into a job output
//! - Route every failure through the error classifier
//!
//! # Design Decisions
//! - No retries here; retrying exists only in startup readiness probing
//! - Each call carries its own deadline

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::backend::BackendEndpoint;
use crate::config::TimeoutConfig;
use crate::http::error::{classify, ProxyError};
use crate::http::request::{OutboundRequest, RequestKind};
use crate::http::response::{ensure_success, into_output};
use crate::job::{JobInput, JobOutput, JobResult};
use crate::observability::metrics;

/// Multipart part name carrying the uploaded file.
pub const UPLOAD_PART_NAME: &str = "file";
/// File name declared on the uploaded part.
pub const UPLOAD_FILE_NAME: &str = "audio_file";

/// Per-call deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyTimeouts {
    pub request: Duration,
    pub upload: Duration,
    pub download: Duration,
}

impl From<&TimeoutConfig> for ProxyTimeouts {
    fn from(config: &TimeoutConfig) -> Self {
        Self {
            request: Duration::from_secs(config.request_secs),
            upload: Duration::from_secs(config.upload_secs),
            download: Duration::from_secs(config.download_secs),
        }
    }
}

impl Default for ProxyTimeouts {
    fn default() -> Self {
        Self::from(&TimeoutConfig::default())
    }
}

/// Forwards job inputs to the backend.
#[derive(Debug, Clone)]
pub struct RequestTranslator {
    client: Client,
    timeouts: ProxyTimeouts,
}

impl RequestTranslator {
    pub fn new(client: Client, timeouts: ProxyTimeouts) -> Self {
        Self { client, timeouts }
    }

    /// Forward one job and return its result. Never fails.
    pub async fn translate(&self, input: &JobInput, endpoint: &BackendEndpoint) -> JobResult {
        match self.forward(input, endpoint).await {
            Ok(output) => {
                metrics::record_outcome("success");
                JobResult::Success(output)
            }
            Err(e) => classify(e),
        }
    }

    /// Forward one job, surfacing failures as `ProxyError`.
    pub async fn forward(
        &self,
        input: &JobInput,
        endpoint: &BackendEndpoint,
    ) -> Result<JobOutput, ProxyError> {
        let outbound = OutboundRequest::from_job(input, endpoint)?;

        tracing::info!(method = %outbound.method(), url = %outbound.url, "Proxying request");

        let request = self
            .client
            .request(outbound.method(), outbound.url.clone())
            .headers(outbound.headers)
            .query(&outbound.query);

        let request = match outbound.kind {
            RequestKind::Upload { file_url, fields } => {
                let file = self.download(&file_url).await?;
                let mut form = Form::new().part(
                    UPLOAD_PART_NAME,
                    Part::bytes(file).file_name(UPLOAD_FILE_NAME),
                );
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                request.multipart(form).timeout(self.timeouts.upload)
            }
            RequestKind::Query => request.timeout(self.timeouts.request),
            RequestKind::Json { body, .. } => request.json(&body).timeout(self.timeouts.request),
            RequestKind::Other { body, .. } => {
                let request = request.timeout(self.timeouts.request);
                match body {
                    Some(body) => request.json(&body),
                    None => request,
                }
            }
        };

        let response = ensure_success(request.send().await?).await?;
        tracing::debug!(status = %response.status(), "Backend responded");

        into_output(response).await
    }

    /// Stream a remote file into memory.
    async fn download(&self, file_url: &str) -> Result<Vec<u8>, ProxyError> {
        tracing::info!(file_url, "Downloading file");

        let response = self
            .client
            .get(file_url)
            .timeout(self.timeouts.download)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let mut file = Vec::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            file.extend_from_slice(&chunk?);
        }

        tracing::debug!(bytes = file.len(), "File downloaded");
        Ok(file)
    }
}
