//! Startup orchestration.
//!
//! # Responsibilities
//! - Launch the backend process
//! - Probe it until ready or attempts run out
//! - Build the immutable readiness gate and the job handler
//!
//! # Design Decisions
//! - Fail fast: a spawn failure is fatal
//! - A backend that never becomes ready is not an error here; the gate stays
//!   closed and the caller decides whether to serve

use std::sync::Arc;

use reqwest::Client;
use thiserror::Error;

use crate::backend::{BackendError, BackendProcess};
use crate::config::WorkerConfig;
use crate::health::{ReadinessGate, ReadinessProber};
use crate::http::{ProxyTimeouts, RequestTranslator};
use crate::job::JobHandler;
use crate::observability::metrics;

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid readiness path: {0}")]
    ReadinessPath(#[from] url::ParseError),
}

/// A started worker: the job handler and the backend it fronts.
#[derive(Debug)]
pub struct Worker {
    pub handler: Arc<JobHandler>,
    pub process: BackendProcess,
}

/// Start the backend and decide readiness.
pub async fn initialize(config: &WorkerConfig) -> Result<Worker, StartupError> {
    let client = Client::builder()
        .user_agent(concat!("job-proxy/", env!("CARGO_PKG_VERSION")))
        .build()?;
    initialize_with_client(config, client).await
}

/// [`initialize`] with a caller-supplied HTTP client.
pub async fn initialize_with_client(
    config: &WorkerConfig,
    client: Client,
) -> Result<Worker, StartupError> {
    let process = BackendProcess::spawn(&config.backend)?;
    let endpoint = process.endpoint().clone();

    let prober = ReadinessProber::new(client.clone(), &endpoint, &config.readiness)?;
    let ready = prober.wait_until_ready().await;
    metrics::record_backend_ready(ready);

    tracing::info!(endpoint = %endpoint, pid = ?process.pid(), ready, "Startup complete");

    let gate = ReadinessGate::new(endpoint, ready);
    let translator = RequestTranslator::new(client, ProxyTimeouts::from(&config.timeouts));

    Ok(Worker {
        handler: Arc::new(JobHandler::new(gate, translator)),
        process,
    })
}
