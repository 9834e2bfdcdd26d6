//! In-memory wizard sessions.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use common::{AppError, AppResult};
use registration_service_lib::Wizard;

/// Idle time after which a session is discarded (30 minutes)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

/// Live sessions kept at most at once
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// A wizard behind its own lock; requests for one session run one at a time.
pub type SharedWizard = Arc<Mutex<Wizard>>;

struct Session {
    wizard: SharedWizard,
    touched: Instant,
}

impl Session {
    fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.touched)
    }
}

/// Live sessions keyed by id. Nothing survives a restart.
///
/// A session idle for longer than the TTL is gone: lookups treat it as
/// unknown and [`SessionStore::sweep_expired`] drops it from memory.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(
            Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            DEFAULT_MAX_SESSIONS,
        )
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            capacity,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Register a wizard under a fresh id.
    ///
    /// When the store is full, idle sessions are swept first; if it is
    /// still full the wizard is refused.
    pub async fn insert(&self, wizard: Wizard) -> AppResult<(Uuid, SharedWizard)> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        if sessions.len() >= self.capacity {
            sessions.retain(|_, session| session.idle_for(now) < self.ttl);
            if sessions.len() >= self.capacity {
                warn!(capacity = self.capacity, "Session store full");
                return Err(AppError::service_unavailable("session store"));
            }
        }

        let id = Uuid::new_v4();
        let wizard = Arc::new(Mutex::new(wizard));
        sessions.insert(
            id,
            Session {
                wizard: wizard.clone(),
                touched: now,
            },
        );
        Ok((id, wizard))
    }

    /// Look up a session and mark it as used.
    pub async fn get(&self, id: Uuid) -> AppResult<SharedWizard> {
        self.get_at(id, Instant::now()).await
    }

    async fn get_at(&self, id: Uuid, now: Instant) -> AppResult<SharedWizard> {
        let mut sessions = self.sessions.write().await;

        let expired = match sessions.get_mut(&id) {
            None => return Err(AppError::NotFound),
            Some(session) if session.idle_for(now) >= self.ttl => true,
            Some(session) => {
                session.touched = now;
                return Ok(session.wizard.clone());
            }
        };

        if expired {
            sessions.remove(&id);
            debug!(%id, "Expired session discarded on lookup");
        }
        Err(AppError::NotFound)
    }

    /// Drop a session and its draft. Returns false if it did not exist.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Drop every session idle for at least the TTL. Returns how many went.
    pub async fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Instant::now()).await
    }

    pub async fn sweep_expired_at(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for(now) < self.ttl);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registration_service_lib::repository::RegistrationStore;
    use registration_service_lib::service::{RegistrationService, Registrar};
    use registration_service_lib::StepPlan;

    fn wizard() -> Wizard {
        let store = Arc::new(datastore::MockDataStore::new());
        let service: Arc<dyn RegistrationService> =
            Arc::new(Registrar::new(Arc::new(RegistrationStore::new(store, "registrations"))));
        Wizard::new(StepPlan::standard(true), service)
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let sessions = SessionStore::new();
        let (id, _) = sessions.insert(wizard()).await.unwrap();

        assert!(sessions.get(id).await.is_ok());
        assert_eq!(sessions.len().await, 1);

        assert!(sessions.remove(id).await);
        assert!(!sessions.remove(id).await);
        assert!(sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_session_not_found() {
        let sessions = SessionStore::new();

        let err = sessions.get(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_sweep_removes_idle_sessions() {
        let sessions = SessionStore::with_limits(secs(30), 10);
        let start = Instant::now();
        let (id, _) = sessions.insert(wizard()).await.unwrap();

        assert_eq!(sessions.sweep_expired_at(start).await, 0);
        assert_eq!(sessions.len().await, 1);

        assert_eq!(sessions.sweep_expired_at(start + secs(31)).await, 1);
        assert!(sessions.is_empty().await);
        assert!(matches!(sessions.get(id).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_lookup_keeps_session_alive() {
        let sessions = SessionStore::with_limits(secs(30), 10);
        let start = Instant::now();
        let (id, _) = sessions.insert(wizard()).await.unwrap();

        assert!(sessions.get_at(id, start + secs(20)).await.is_ok());

        assert_eq!(sessions.sweep_expired_at(start + secs(40)).await, 0);
        assert_eq!(sessions.sweep_expired_at(start + secs(51)).await, 1);
    }

    #[tokio::test]
    async fn test_expired_session_not_found_on_lookup() {
        let sessions = SessionStore::with_limits(secs(30), 10);
        let start = Instant::now();
        let (id, _) = sessions.insert(wizard()).await.unwrap();

        let err = sessions.get_at(id, start + secs(31)).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound));
        assert!(sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_full_store_refuses_new_sessions() {
        let sessions = SessionStore::with_limits(secs(30), 2);
        sessions.insert(wizard()).await.unwrap();
        sessions.insert(wizard()).await.unwrap();

        let err = sessions.insert(wizard()).await.unwrap_err();

        assert!(matches!(err, AppError::ServiceUnavailable(_)));
        assert_eq!(sessions.len().await, 2);
    }

    #[tokio::test]
    async fn test_full_store_makes_room_from_idle_sessions() {
        let sessions = SessionStore::with_limits(Duration::ZERO, 1);
        sessions.insert(wizard()).await.unwrap();

        assert!(sessions.insert(wizard()).await.is_ok());
        assert_eq!(sessions.len().await, 1);
    }
}
