//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file ($JOB_PROXY_CONFIG)
//!     → loader.rs (parse & deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → WorkerConfig (validated, immutable)
//!     → handed to startup, which builds every subsystem from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - `UVICORN_HOST` / `UVICORN_PORT` win over the file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::WorkerConfig;
pub use schema::{BackendConfig, ListenerConfig, ObservabilityConfig, ReadinessConfig, TimeoutConfig};
