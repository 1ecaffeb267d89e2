//! Core types for the registration adapter.
//!
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Observability and registration configuration

mod config;
mod errors;

pub use config::{
    Config, ObservabilityConfig, RegistrationConfig, ENV_ELICIT_TIMEOUT, ENV_LOG_FORMAT,
    ENV_LOG_LEVEL,
};
pub use errors::{BoxError, Error, Result};
