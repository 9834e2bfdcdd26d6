//! Shared configuration structures.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Base service configuration shared by every binary.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Service name for logging and tracing
    pub service_name: String,
    /// Host address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: "service".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
        }
    }
}

/// Read a variable, falling back to `default` when unset.
pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse a variable, falling back to `default` when unset or
/// unparseable.
pub fn env_parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read a variable, treating empty values as unset.
pub fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
