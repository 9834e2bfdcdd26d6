//! API Gateway Library
//!
//! This crate provides the HTTP REST API driving registration wizard
//! sessions over the registration service and data store.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod sessions;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use datastore::{DataStore, SupabaseClient};

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::sessions::SessionStore;
use crate::state::AppState;

/// One trivial read against `table`. The outcome is logged only.
pub async fn probe_connection(store: &dyn DataStore, table: &str) -> bool {
    match store.ping(table).await {
        Ok(()) => {
            info!(table, "Data store connection verified");
            true
        }
        Err(e) => {
            warn!(table, kind = %e.kind(), error = %e, "Data store connection probe failed");
            false
        }
    }
}

/// Periodically discard idle wizard sessions.
pub fn spawn_session_sweeper(sessions: SessionStore) -> JoinHandle<()> {
    let every = (sessions.ttl() / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let removed = sessions.sweep_expired().await;
            if removed > 0 {
                debug!(removed, "Idle registration sessions discarded");
            }
        }
    })
}

/// Run the HTTP server with the given configuration.
///
/// Fails before binding if the data store settings are incomplete.
pub async fn run(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Create data store client
    let store: Arc<dyn DataStore> = Arc::new(SupabaseClient::new(&config.datastore)?);
    probe_connection(store.as_ref(), &config.registration.registrations_table).await;

    let addr: SocketAddr = config.bind_address().parse()?;

    // Create app state
    let state = AppState::new(store, config);
    spawn_session_sweeper(state.sessions.clone());

    // Build router
    let app = create_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    info!("Gateway listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
