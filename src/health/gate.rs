//! Readiness gate.
//!
//! # States
//! - Open: backend passed its startup probe, jobs are forwarded
//! - Closed: probing exhausted, every job short-circuits
//!
//! # Design Decisions
//! - Computed once at startup and never re-probed
//! - Immutable value injected into the handler; no globals, no locking

use crate::backend::BackendEndpoint;

/// Immutable readiness state for the worker's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessGate {
    endpoint: BackendEndpoint,
    ready: bool,
}

impl ReadinessGate {
    pub fn new(endpoint: BackendEndpoint, ready: bool) -> Self {
        Self { endpoint, ready }
    }

    /// Whether the backend became ready at startup.
    pub fn is_open(&self) -> bool {
        self.ready
    }

    /// The backend every forwarded job targets.
    pub fn endpoint(&self) -> &BackendEndpoint {
        &self.endpoint
    }
}
