//! Repository layer for data access.

mod registration_repository;

pub use registration_repository::{RegistrationRepository, RegistrationStore};

#[cfg(any(test, feature = "test-utils"))]
pub use registration_repository::MockRegistrationRepository;
