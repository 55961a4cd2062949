#![forbid(unsafe_code)]
//! linkrank-core library.
//!
//! Corpus model, directory crawler, configuration and the error taxonomy
//! shared by the estimators in `linkrank-rank`.
//!
//! # Conventions
//!
//! - **Errors**: Precondition failures are [`RankError`]; I/O-facing code
//!   (crawler, config loading) returns `anyhow::Result` with context.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod config;
pub mod corpus;
pub mod error;

pub use config::{DanglingPolicy, RankConfig};
pub use corpus::Corpus;
pub use error::{RankError, Result};
