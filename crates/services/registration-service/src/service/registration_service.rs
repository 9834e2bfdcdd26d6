//! Registration service - submission of completed wizards.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

use common::{AppError, AppResult};
use datastore::{DataError, DataErrorKind};
use domain::{Registration, StoredRegistration};

use crate::repository::RegistrationRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Registration service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Persist a validated registration.
    ///
    /// Duplicates surface as [`AppError::Conflict`], rejected credentials as
    /// [`AppError::Forbidden`], anything else as
    /// [`AppError::ServiceUnavailable`].
    async fn submit(&self, registration: Registration) -> AppResult<StoredRegistration>;
}

/// Concrete implementation of RegistrationService using repository.
pub struct Registrar {
    repo: Arc<dyn RegistrationRepository>,
}

impl Registrar {
    /// Create new registration service instance with repository
    pub fn new(repo: Arc<dyn RegistrationRepository>) -> Self {
        Self { repo }
    }
}

/// Map a data-store failure on the submission path.
fn submission_error(err: DataError) -> AppError {
    match err.kind() {
        DataErrorKind::UniqueViolation => {
            warn!(error = %err, "Registration rejected as duplicate");
            AppError::conflict("Registration")
        }
        DataErrorKind::PermissionDenied => {
            error!(error = %err, "Data store denied the registration insert");
            AppError::Forbidden
        }
        DataErrorKind::Generic => {
            error!(error = %err, "Registration could not be stored");
            AppError::service_unavailable("data store")
        }
    }
}

#[async_trait]
impl RegistrationService for Registrar {
    async fn submit(&self, mut registration: Registration) -> AppResult<StoredRegistration> {
        // Emails are unique regardless of case
        registration.personal_info.email = registration.personal_info.email.trim().to_lowercase();
        let email = registration.personal_info.email.clone();

        // Check if email already exists
        if self
            .repo
            .find_by_email(&email)
            .await
            .map_err(submission_error)?
            .is_some()
        {
            warn!(%email, "Registration for existing email");
            return Err(AppError::conflict("Registration"));
        }

        let record = registration.into_record()?;
        let stored = self.repo.create(record).await.map_err(submission_error)?;

        info!(id = %stored.id, "Registration stored");
        Ok(stored)
    }
}
