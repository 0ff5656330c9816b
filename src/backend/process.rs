//! Backend process launch.
//!
//! # Responsibilities
//! - Start the backend server as a child process bound to `host:port`
//! - Expose its PID and endpoint
//!
//! # Design Decisions
//! - Never waits for the backend to answer; readiness is probed separately
//! - Spawn failure is fatal and never retried
//! - The child is killed when the handle is dropped, so it cannot outlive
//!   the worker

use std::process::{ExitStatus, Stdio};

use thiserror::Error;
use tokio::process::{Child, Command};

use crate::backend::endpoint::BackendEndpoint;
use crate::config::BackendConfig;

/// Errors launching the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The configured host/port do not form a valid URL.
    #[error("invalid backend address {host}:{port}: {source}")]
    Address {
        host: String,
        port: u16,
        #[source]
        source: url::ParseError,
    },

    /// The process could not be created (missing executable, permissions).
    #[error("failed to spawn backend '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Handle to the running backend child process.
#[derive(Debug)]
pub struct BackendProcess {
    child: Child,
    pid: Option<u32>,
    endpoint: BackendEndpoint,
}

impl BackendProcess {
    /// Launch the backend described by `config`.
    ///
    /// `--host <host> --port <port>` are appended to the configured args.
    pub fn spawn(config: &BackendConfig) -> Result<Self, BackendError> {
        let endpoint = BackendEndpoint::new(config.host.clone(), config.port).map_err(|source| {
            BackendError::Address {
                host: config.host.clone(),
                port: config.port,
                source,
            }
        })?;

        tracing::info!(
            command = %config.command,
            args = ?config.args,
            endpoint = %endpoint,
            "Starting backend server"
        );

        let child = Command::new(&config.command)
            .args(&config.args)
            .arg("--host")
            .arg(&config.host)
            .arg("--port")
            .arg(config.port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| BackendError::Spawn {
                command: config.command.clone(),
                source,
            })?;

        let pid = child.id();
        tracing::info!(pid = ?pid, "Backend server process started");

        Ok(Self { child, pid, endpoint })
    }

    /// OS process id, if the process was still running when spawned.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Where the backend listens.
    pub fn endpoint(&self) -> &BackendEndpoint {
        &self.endpoint
    }

    /// Exit status if the backend has already exited.
    pub fn try_exit_status(&mut self) -> std::io::Result<Option<ExitStatus>> {
        self.child.try_wait()
    }

    /// Wait for the backend to exit on its own.
    pub async fn wait(&mut self) -> std::io::Result<ExitStatus> {
        self.child.wait().await
    }

    /// Kill the backend and reap it.
    pub async fn stop(mut self) -> std::io::Result<()> {
        if self.child.try_wait()?.is_some() {
            return Ok(());
        }
        tracing::info!(pid = ?self.pid, "Stopping backend server");
        self.child.kill().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(command: &str, args: &[&str]) -> BackendConfig {
        BackendConfig {
            host: "127.0.0.1".into(),
            port: 18_000,
            command: command.into(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_spawn_exposes_pid_and_endpoint() {
        // `sh -c` ignores the trailing `--host/--port` words (they become $0..$3).
        let process = BackendProcess::spawn(&config("sh", &["-c", "sleep 5"])).unwrap();

        assert!(process.pid().is_some());
        assert_eq!(process.endpoint().to_string(), "127.0.0.1:18000");

        process.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_exit_status_is_observable() {
        let mut process = BackendProcess::spawn(&config("sh", &["-c", "exit 3"])).unwrap();

        let status = loop {
            if let Some(status) = process.try_exit_status().unwrap() {
                break status;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        };
        assert_eq!(status.code(), Some(3));

        process.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_executable_is_fatal() {
        let err = BackendProcess::spawn(&config("definitely-not-a-real-binary-7f3a", &[])).unwrap_err();
        assert!(matches!(err, BackendError::Spawn { .. }));
        assert!(err.to_string().contains("definitely-not-a-real-binary-7f3a"));
    }
}
