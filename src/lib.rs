//! Serverless job worker that fronts a locally managed HTTP backend.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                  JOB WORKER                   │
//!                      │                                               │
//!   startup (once)     │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!   ───────────────────┼─▶│ backend │──▶│  health  │──▶│ Readiness │  │
//!                      │  │ process │   │  prober  │   │   Gate    │  │
//!                      │  └────┬────┘   └──────────┘   └─────┬─────┘  │
//!                      │       │ spawns                      │        │
//!                      │       ▼                             ▼        │
//!   job { input }      │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!   ───────────────────┼─▶│ job API │──▶│   job    │──▶│  request  │──┼──▶ Backend
//!                      │  │ /runsync│   │ handler  │   │translator │  │    (child)
//!   JobResult          │  └─────────┘   └──────────┘   └─────┬─────┘  │
//!   ◀──────────────────┼───────────────────────────────────────┘       │
//!                      │         (content-type shaping / error         │
//!                      │          classification)                      │
//!                      └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod backend;
pub mod health;
pub mod http;
pub mod job;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::WorkerConfig;
pub use http::JobServer;
pub use job::{JobHandler, JobInput, JobRequest, JobResult};
pub use lifecycle::Shutdown;
