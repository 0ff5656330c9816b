//! Per-job entry point.
//!
//! # Responsibilities
//! - Short-circuit every job while the readiness gate is closed
//! - Delegate open-gate jobs to the request translator
//! - Tag each job with an id and a tracing span

use std::time::Instant;

use tracing::Instrument;
use uuid::Uuid;

use crate::health::ReadinessGate;
use crate::http::RequestTranslator;
use crate::job::{JobInput, JobRequest, JobResponse, JobResult};
use crate::observability::metrics;

/// Handles jobs against the backend behind `gate`.
#[derive(Debug, Clone)]
pub struct JobHandler {
    gate: ReadinessGate,
    translator: RequestTranslator,
}

impl JobHandler {
    pub fn new(gate: ReadinessGate, translator: RequestTranslator) -> Self {
        Self { gate, translator }
    }

    pub fn gate(&self) -> &ReadinessGate {
        &self.gate
    }

    /// Produce the result for one job input.
    pub async fn handle(&self, input: &JobInput) -> JobResult {
        if !self.gate.is_open() {
            tracing::warn!("Rejecting job: backend server is not ready");
            metrics::record_outcome("not_ready");
            return JobResult::not_ready();
        }
        self.translator.translate(input, self.gate.endpoint()).await
    }

    /// Run a full job envelope, assigning an id when the caller did not.
    pub async fn run(&self, request: JobRequest) -> JobResponse {
        let id = request.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let span = tracing::info_span!("job", job_id = %id);

        let start = Instant::now();
        let output = self.handle(&request.input).instrument(span).await;
        metrics::record_job_duration(start);

        JobResponse::new(id, output)
    }
}
