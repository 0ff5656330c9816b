//! Local job-invocation API.
//!
//! # Responsibilities
//! - Accept job envelopes over HTTP and return job responses
//! - Report worker readiness
//! - Wire up middleware (tracing, timeout, body limit)
//!
//! # Routes
//! - `POST /runsync`: run one job to completion; a malformed envelope gets
//!   `{"error": {"message": ...}}` with the rejection status
//! - `GET /health`: 200 when the backend is ready, 503 otherwise

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ListenerConfig;
use crate::job::{JobError, JobHandler, JobRequest, JobResult};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<JobHandler>,
}

/// HTTP server exposing the job handler.
pub struct JobServer {
    router: Router,
}

impl JobServer {
    /// Create a new job server around `handler`.
    pub fn new(handler: Arc<JobHandler>, config: &ListenerConfig) -> Self {
        let router = Self::build_router(config, AppState { handler });
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ListenerConfig, state: AppState) -> Router {
        Router::new()
            .route("/runsync", post(run_sync))
            .route("/health", get(health))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for driving the API without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Job API listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Job API received shutdown signal");
            })
            .await?;

        tracing::info!("Job API stopped");
        Ok(())
    }
}

async fn run_sync(
    State(state): State<AppState>,
    request: Result<Json<JobRequest>, JsonRejection>,
) -> Response {
    match request {
        Ok(Json(request)) => Json(state.handler.run(request).await).into_response(),
        // Malformed envelopes still get a JSON body.
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Rejected job envelope");
            let error = JobError::new(rejection.body_text());
            (rejection.status(), Json(JobResult::error(error))).into_response()
        }
    }
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.handler.gate().is_open();
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(json!({ "ready": ready })))
}
