//! Multi-step registration wizard.
//!
//! The step sequence is data ([`StepPlan`]); the [`Wizard`] walks it,
//! gating every forward move on the active step's rule set and handing the
//! completed aggregate to a [`RegistrationService`](crate::service::RegistrationService).

mod controller;
pub mod progress;
mod steps;

pub use controller::{AdvanceOutcome, Wizard, WizardError, WizardState};
pub use progress::{markers, StepMarker, StepStatus};
pub use steps::{StepDescriptor, StepKind, StepPlan};
