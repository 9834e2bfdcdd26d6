//! Gateway configuration.

use std::time::Duration;

use common::config::{env_or, env_parse_or};
use common::ServiceConfig;
use datastore::DataStoreConfig;
use registration_service_lib::config::RegistrationServiceConfig;

use crate::sessions::{DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL_SECS};

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bind address and log level
    pub service: ServiceConfig,
    /// Data store connection
    pub datastore: DataStoreConfig,
    /// Table names and wizard defaults
    pub registration: RegistrationServiceConfig,
    /// Idle seconds before a wizard session is discarded
    pub session_ttl_secs: u64,
    /// Upper bound on live wizard sessions
    pub max_sessions: usize,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = ServiceConfig::default();
        Self {
            service: ServiceConfig {
                service_name: "gateway".to_string(),
                host: env_or("GATEWAY_HOST", &defaults.host),
                port: env_parse_or("GATEWAY_PORT", defaults.port),
                log_level: defaults.log_level,
            },
            datastore: DataStoreConfig::from_env(),
            registration: RegistrationServiceConfig::from_env(),
            session_ttl_secs: env_parse_or("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS),
            max_sessions: env_parse_or("MAX_SESSIONS", DEFAULT_MAX_SESSIONS),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.host, self.service.port)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                service_name: "gateway".to_string(),
                ..ServiceConfig::default()
            },
            datastore: DataStoreConfig::default(),
            registration: RegistrationServiceConfig::default(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}
