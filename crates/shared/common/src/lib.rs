//! Common utilities shared across the registration crates.
//!
//! This crate provides:
//! - Unified error handling for HTTP responses
//! - Configuration helpers
//! - Tracing initialisation

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
pub use telemetry::init_tracing;
