//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the worker.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the job worker.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WorkerConfig {
    /// Backend process settings (command, bind address).
    pub backend: BackendConfig,

    /// Startup readiness probing.
    pub readiness: ReadinessConfig,

    /// Outbound request timeouts.
    pub timeouts: TimeoutConfig,

    /// Local job API listener.
    pub listener: ListenerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend server process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Host the backend binds to (overridden by `UVICORN_HOST`).
    pub host: String,

    /// Port the backend binds to (overridden by `UVICORN_PORT`).
    pub port: u16,

    /// Executable launched as the backend.
    pub command: String,

    /// Arguments passed before `--host` / `--port`.
    pub args: Vec<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            command: "uvicorn".to_string(),
            args: vec!["speaches.main:app".to_string()],
        }
    }
}

/// Readiness probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Path to probe on the backend.
    pub path: String,

    /// Number of probe attempts before giving up.
    pub max_attempts: u32,

    /// Delay between failed attempts in seconds.
    pub delay_secs: u64,

    /// Per-attempt timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            path: "/health".to_string(),
            max_attempts: 12,
            delay_secs: 5,
            timeout_secs: 5,
        }
    }
}

/// Timeout configuration for outbound calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Plain and JSON-body backend requests, in seconds.
    pub request_secs: u64,

    /// Multipart uploads to the backend, in seconds.
    pub upload_secs: u64,

    /// Remote file downloads, in seconds.
    pub download_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 120,
            upload_secs: 300,
            download_secs: 300,
        }
    }
}

/// Listener configuration for the local job API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum accepted job envelope size.
    pub max_body_bytes: usize,

    /// Upper bound on a single job API call in seconds. Must exceed
    /// `timeouts.download_secs + timeouts.upload_secs`.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 10 * 1024 * 1024,
            request_timeout_secs: 900,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_backend_contract() {
        let config = WorkerConfig::default();
        assert_eq!(config.backend.host, "127.0.0.1");
        assert_eq!(config.backend.port, 8000);
        assert_eq!(config.readiness.path, "/health");
        assert_eq!(config.readiness.max_attempts, 12);
        assert_eq!(config.timeouts.request_secs, 120);
        assert_eq!(config.timeouts.download_secs, 300);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: WorkerConfig = toml::from_str(
            r#"
            [backend]
            port = 9001

            [readiness]
            max_attempts = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.port, 9001);
        assert_eq!(config.backend.command, "uvicorn");
        assert_eq!(config.readiness.max_attempts, 3);
        assert_eq!(config.readiness.delay_secs, 5);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }
}
