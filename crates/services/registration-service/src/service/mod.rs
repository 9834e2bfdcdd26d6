//! Service layer for registration use cases.

mod registration_service;

pub use registration_service::{Registrar, RegistrationService};

#[cfg(any(test, feature = "test-utils"))]
pub use registration_service::MockRegistrationService;
