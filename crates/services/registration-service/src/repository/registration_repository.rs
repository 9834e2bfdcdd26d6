//! Registration rows over any [`DataStore`].

use async_trait::async_trait;
use std::sync::Arc;

use datastore::{from_record, to_record, DataResult, DataStore, Direction, Filter};
use domain::{NewRegistration, StoredRegistration};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Registration repository trait for dependency injection.
///
/// Errors keep their data-store classification so callers can tell a
/// duplicate from a rejected key.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Insert a new registration row
    async fn create(&self, record: NewRegistration) -> DataResult<StoredRegistration>;

    /// Find a registration by email address
    async fn find_by_email(&self, email: &str) -> DataResult<Option<StoredRegistration>>;

    /// Most recent registrations, newest first
    async fn recent(&self, limit: usize) -> DataResult<Vec<StoredRegistration>>;
}

/// Concrete implementation of RegistrationRepository.
pub struct RegistrationStore {
    store: Arc<dyn DataStore>,
    table: String,
}

impl RegistrationStore {
    /// Create new repository instance over `table`
    pub fn new(store: Arc<dyn DataStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl RegistrationRepository for RegistrationStore {
    async fn create(&self, record: NewRegistration) -> DataResult<StoredRegistration> {
        let row = to_record(&record)?;
        let stored = self.store.insert(&self.table, row).await?;
        from_record(stored)
    }

    async fn find_by_email(&self, email: &str) -> DataResult<Option<StoredRegistration>> {
        let filter = Filter::new().eq("email", email);
        let rows = self.store.select(&self.table, &filter, Some(1)).await?;

        rows.into_iter()
            .next()
            .map(from_record::<StoredRegistration>)
            .transpose()
    }

    async fn recent(&self, limit: usize) -> DataResult<Vec<StoredRegistration>> {
        let filter = Filter::new().order_by("created_at", Direction::Descending);

        self.store
            .select(&self.table, &filter, Some(limit))
            .await?
            .into_iter()
            .map(from_record::<StoredRegistration>)
            .collect()
    }
}
