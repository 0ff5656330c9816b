//! Startup readiness probing.
//!
//! # Responsibilities
//! - Poll the backend health endpoint until it answers 200
//! - Give up after a bounded number of attempts
//!
//! # Design Decisions
//! - Fixed delay between attempts (backend start-up time is slow and variable)
//! - Transport errors and non-200 statuses both count as failed attempts
//! - No sleep after the final attempt

use std::time::Duration;

use reqwest::{Client, StatusCode};
use url::Url;

use crate::backend::BackendEndpoint;
use crate::config::ReadinessConfig;

/// Polls the backend health endpoint at startup.
#[derive(Debug, Clone)]
pub struct ReadinessProber {
    client: Client,
    url: Url,
    max_attempts: u32,
    delay: Duration,
    timeout: Duration,
}

impl ReadinessProber {
    pub fn new(
        client: Client,
        endpoint: &BackendEndpoint,
        config: &ReadinessConfig,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            url: endpoint.url_for(&config.path)?,
            max_attempts: config.max_attempts,
            delay: Duration::from_secs(config.delay_secs),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Override the inter-attempt delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Override the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL being probed.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Block until the backend answers 200 or attempts run out.
    pub async fn wait_until_ready(&self) -> bool {
        tracing::info!(
            url = %self.url,
            max_attempts = self.max_attempts,
            delay = ?self.delay,
            "Waiting for backend server"
        );

        for attempt in 1..=self.max_attempts {
            if self.probe(attempt).await {
                tracing::info!(attempt, "Backend server is ready");
                return true;
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.delay).await;
            }
        }

        tracing::error!(
            attempts = self.max_attempts,
            "Backend server failed to start in the allocated time"
        );
        false
    }

    async fn probe(&self, attempt: u32) -> bool {
        let result = self
            .client
            .get(self.url.clone())
            .header("user-agent", "job-proxy-readiness-check")
            .timeout(self.timeout)
            .send()
            .await;

        match result {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                tracing::warn!(
                    attempt,
                    max_attempts = self.max_attempts,
                    status = %response.status(),
                    "Backend not ready yet: non-success status"
                );
                false
            }
            Err(e) => {
                tracing::warn!(
                    attempt,
                    max_attempts = self.max_attempts,
                    error = %e,
                    "Backend not ready yet"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_url_uses_configured_path() {
        let endpoint = BackendEndpoint::new("127.0.0.1", 8000).unwrap();
        let prober = ReadinessProber::new(Client::new(), &endpoint, &ReadinessConfig::default()).unwrap();
        assert_eq!(prober.url().as_str(), "http://127.0.0.1:8000/health");
    }

    #[tokio::test]
    async fn test_unreachable_backend_exhausts_attempts() {
        // Reserve a port and release it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let endpoint = BackendEndpoint::new("127.0.0.1", port).unwrap();
        let config = ReadinessConfig {
            max_attempts: 3,
            ..ReadinessConfig::default()
        };
        let prober = ReadinessProber::new(Client::new(), &endpoint, &config)
            .unwrap()
            .with_delay(Duration::from_millis(20))
            .with_timeout(Duration::from_millis(500));

        let started = std::time::Instant::now();
        assert!(!prober.wait_until_ready().await);
        // Two sleeps between three attempts.
        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
