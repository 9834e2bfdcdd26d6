//! Registration Service Library
//!
//! This crate provides the registration workflow: the step plan, the wizard
//! controller driving it, and the submission use case persisting completed
//! registrations through a [`datastore::DataStore`].

pub mod config;
pub mod repository;
pub mod service;
pub mod wizard;

use std::sync::Arc;

use datastore::DataStore;

use crate::config::RegistrationServiceConfig;
use crate::repository::RegistrationStore;
use crate::service::{Registrar, RegistrationService};

pub use wizard::{
    AdvanceOutcome, StepDescriptor, StepKind, StepMarker, StepPlan, StepStatus, Wizard,
    WizardError, WizardState,
};

/// Wire the submission service over `store`.
pub fn build_service(
    store: Arc<dyn DataStore>,
    config: &RegistrationServiceConfig,
) -> Arc<dyn RegistrationService> {
    let repo = Arc::new(RegistrationStore::new(store, config.registrations_table.clone()));
    Arc::new(Registrar::new(repo))
}
