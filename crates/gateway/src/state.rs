//! Application state for dependency injection.

use std::sync::Arc;

use datastore::DataStore;
use registration_service_lib::build_service;
use registration_service_lib::service::RegistrationService;

use crate::config::GatewayConfig;
use crate::sessions::SessionStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataStore>,
    pub registrations: Arc<dyn RegistrationService>,
    pub sessions: SessionStore,
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new app state, wiring the registration service over `store`.
    pub fn new(store: Arc<dyn DataStore>, config: GatewayConfig) -> Self {
        let registrations = build_service(store.clone(), &config.registration);
        Self::with_service(store, registrations, config)
    }

    pub fn with_service(
        store: Arc<dyn DataStore>,
        registrations: Arc<dyn RegistrationService>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            store,
            registrations,
            sessions: SessionStore::with_limits(config.session_ttl(), config.max_sessions),
            config,
        }
    }
}
