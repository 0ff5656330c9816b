//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WorkerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::WorkerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &WorkerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.backend.host.trim().is_empty() {
        errors.push(ValidationError::new("backend.host", "must not be empty"));
    }
    if config.backend.port == 0 {
        errors.push(ValidationError::new("backend.port", "must be non-zero"));
    }
    if config.backend.command.trim().is_empty() {
        errors.push(ValidationError::new("backend.command", "must not be empty"));
    }

    if !config.readiness.path.starts_with('/') {
        errors.push(ValidationError::new("readiness.path", "must start with '/'"));
    }
    if config.readiness.max_attempts == 0 {
        errors.push(ValidationError::new("readiness.max_attempts", "must be at least 1"));
    }
    if config.readiness.timeout_secs == 0 {
        errors.push(ValidationError::new("readiness.timeout_secs", "must be non-zero"));
    }

    let timeouts = [
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.upload_secs", config.timeouts.upload_secs),
        ("timeouts.download_secs", config.timeouts.download_secs),
        ("listener.request_timeout_secs", config.listener.request_timeout_secs),
    ];
    for (field, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be non-zero"));
        }
    }

    let upload_job_secs = config
        .timeouts
        .download_secs
        .saturating_add(config.timeouts.upload_secs);
    if config.listener.request_timeout_secs <= upload_job_secs {
        errors.push(ValidationError::new(
            "listener.request_timeout_secs",
            format!("must exceed download + upload timeouts ({}s)", upload_job_secs),
        ));
    }

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
