//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::WorkerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Names the optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "JOB_PROXY_CONFIG";
/// Backend bind host.
pub const BACKEND_HOST_ENV: &str = "UVICORN_HOST";
/// Backend bind port.
pub const BACKEND_PORT_ENV: &str = "UVICORN_PORT";
/// Job API bind address.
pub const LISTENER_BIND_ENV: &str = "JOB_PROXY_BIND";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { name: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { name, value } => {
                write!(f, "Invalid value for {}: '{}'", name, value)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<WorkerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: WorkerConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load configuration the way the worker does at startup.
///
/// Reads the file named by `JOB_PROXY_CONFIG` when set, otherwise starts from
/// defaults, then applies environment overrides and validates the result.
pub fn load_from_env() -> Result<WorkerConfig, ConfigError> {
    let config = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => load_config(Path::new(&path))?,
        Err(_) => WorkerConfig::default(),
    };

    let config = apply_env_overrides(config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides using the given lookup.
pub fn apply_env_overrides<F>(mut config: WorkerConfig, lookup: F) -> Result<WorkerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup(BACKEND_HOST_ENV) {
        config.backend.host = host;
    }
    if let Some(port) = lookup(BACKEND_PORT_ENV) {
        config.backend.port = port.trim().parse().map_err(|_| ConfigError::Env {
            name: BACKEND_PORT_ENV,
            value: port.clone(),
        })?;
    }
    if let Some(bind) = lookup(LISTENER_BIND_ENV) {
        config.listener.bind_address = bind;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_env_overrides_backend_address() {
        let config = apply_env_overrides(
            WorkerConfig::default(),
            lookup_from(&[("UVICORN_HOST", "0.0.0.0"), ("UVICORN_PORT", "9000")]),
        )
        .unwrap();

        assert_eq!(config.backend.host, "0.0.0.0");
        assert_eq!(config.backend.port, 9000);
    }

    #[test]
    fn test_missing_env_keeps_defaults() {
        let config = apply_env_overrides(WorkerConfig::default(), lookup_from(&[])).unwrap();
        assert_eq!(config.backend.host, "127.0.0.1");
        assert_eq!(config.backend.port, 8000);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = apply_env_overrides(
            WorkerConfig::default(),
            lookup_from(&[("UVICORN_PORT", "eighty")]),
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Env { name: "UVICORN_PORT", .. }));
        assert!(err.to_string().contains("eighty"));
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!("job-proxy-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[timeouts]\nrequest_secs = 30\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.timeouts.request_secs, 30);
        assert_eq!(config.timeouts.upload_secs, 300);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_config_surfaces_validation() {
        let path = std::env::temp_dir().join(format!("job-proxy-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[readiness]\nmax_attempts = 0\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));

        let _ = fs::remove_file(&path);
    }
}
