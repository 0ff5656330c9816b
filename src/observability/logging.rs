//! Structured logging.
//!
//! `RUST_LOG` wins; otherwise the configured level applies to this crate and
//! to `tower_http`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install the global tracing subscriber. Later calls are no-ops.
pub fn init(config: &ObservabilityConfig) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config)))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

fn default_filter(config: &ObservabilityConfig) -> EnvFilter {
    let level = config.log_level.as_str();
    EnvFilter::try_new(format!("job_proxy={level},tower_http={level}"))
        .unwrap_or_else(|_| EnvFilter::new("job_proxy=info,tower_http=info"))
}
