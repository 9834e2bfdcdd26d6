//! Wizard controller.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use common::AppError;
use domain::{
    AddressInput, ContractInput, FieldErrors, PersonalInfoInput, Registration, RegistrationDraft,
    StepSchema, StoredRegistration, Validation, ValidationContext,
};

use super::progress::{self, StepMarker};
use super::steps::{StepKind, StepPlan};
use crate::service::RegistrationService;

/// Where the wizard stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum WizardState {
    /// Editing a step
    Step { index: usize, kind: StepKind },
    /// Registration persisted; the draft is gone
    Submitted,
    /// Persistence failed; the draft is kept for a retry
    Failed { reason: String },
}

/// Result of a successful [`Wizard::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved on to the given step
    Moved(StepKind),
    /// Final step passed and the registration was stored
    Submitted(StoredRegistration),
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Validation failed: {0}")]
    Invalid(FieldErrors),

    #[error("Submission failed: {0}")]
    Submission(AppError),

    #[error("Registration already submitted")]
    Finished,
}

impl From<WizardError> for AppError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::Invalid(fields) => AppError::InvalidFields(fields),
            WizardError::Submission(err) => err,
            WizardError::Finished => AppError::BadRequest("registration already submitted".into()),
        }
    }
}

#[derive(Debug)]
enum Phase {
    Editing,
    Submitted(StoredRegistration),
    Failed(String),
}

/// One applicant's pass through the step plan.
///
/// Owns its draft exclusively; callers serialize access (one wizard per
/// session, behind that session's lock).
pub struct Wizard {
    plan: StepPlan,
    current: usize,
    draft: RegistrationDraft,
    phase: Phase,
    service: Arc<dyn RegistrationService>,
}

impl std::fmt::Debug for Wizard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wizard")
            .field("plan", &self.plan)
            .field("current", &self.current)
            .field("draft", &self.draft)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl Wizard {
    pub fn new(plan: StepPlan, service: Arc<dyn RegistrationService>) -> Self {
        Self {
            plan,
            current: 0,
            draft: RegistrationDraft::new(),
            phase: Phase::Editing,
            service,
        }
    }

    pub fn plan(&self) -> &StepPlan {
        &self.plan
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The stored registration once submitted.
    pub fn submitted(&self) -> Option<&StoredRegistration> {
        match &self.phase {
            Phase::Submitted(stored) => Some(stored),
            _ => None,
        }
    }

    pub fn state(&self) -> WizardState {
        match &self.phase {
            Phase::Editing => WizardState::Step {
                index: self.current,
                kind: self.current_kind(),
            },
            Phase::Submitted(_) => WizardState::Submitted,
            Phase::Failed(reason) => WizardState::Failed {
                reason: reason.clone(),
            },
        }
    }

    pub fn progress(&self) -> Vec<StepMarker> {
        let current = match self.phase {
            Phase::Submitted(_) => self.plan.len(),
            _ => self.current,
        };
        progress::markers(current, self.plan.len())
    }

    pub fn bind_personal_info(&mut self, input: PersonalInfoInput) -> Result<(), WizardError> {
        self.ensure_open()?;
        self.draft.personal_info = input;
        Ok(())
    }

    pub fn bind_address(&mut self, input: AddressInput) -> Result<(), WizardError> {
        self.ensure_open()?;
        self.draft.address = input;
        Ok(())
    }

    pub fn bind_contract(&mut self, input: ContractInput) -> Result<(), WizardError> {
        self.ensure_open()?;
        self.draft.contract = input;
        Ok(())
    }

    /// Validate the active step and move forward, submitting on the last
    /// step. A failed check leaves the step and draft untouched.
    pub async fn advance(
        &mut self,
        ctx: &ValidationContext,
    ) -> Result<AdvanceOutcome, WizardError> {
        match self.phase {
            Phase::Submitted(_) => return Err(WizardError::Finished),
            Phase::Failed(_) => return self.submit(ctx).await,
            Phase::Editing => {}
        }

        let kind = self.current_kind();
        self.check_step(kind, ctx).map_err(WizardError::Invalid)?;

        if !self.plan.is_last(self.current) {
            self.current += 1;
            let next = self.current_kind();
            debug!(from = ?kind, to = ?next, "Wizard advanced");
            return Ok(AdvanceOutcome::Moved(next));
        }

        self.submit(ctx).await
    }

    /// Step back without validating. Clears a failed submission.
    pub fn retreat(&mut self) -> WizardState {
        match self.phase {
            Phase::Submitted(_) => {}
            Phase::Failed(_) => {
                self.phase = Phase::Editing;
                self.current = self.current.saturating_sub(1);
            }
            Phase::Editing => {
                self.current = self.current.saturating_sub(1);
            }
        }
        self.state()
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        match self.phase {
            Phase::Submitted(_) => Err(WizardError::Finished),
            _ => Ok(()),
        }
    }

    fn current_kind(&self) -> StepKind {
        self.plan
            .get(self.current)
            .map(|step| step.kind)
            .unwrap_or(StepKind::PersonalInfo)
    }

    fn check_step(&self, kind: StepKind, ctx: &ValidationContext) -> Result<(), FieldErrors> {
        match kind {
            StepKind::PersonalInfo => self.draft.personal_info.check(ctx).map(|_| ()),
            StepKind::Address => self.draft.address.check(ctx).map(|_| ()),
            StepKind::Contract => self.draft.contract.check(ctx).map(|_| ()),
        }
    }

    /// Re-check every planned step and assemble the aggregate.
    fn registration(&self, ctx: &ValidationContext) -> Validation<Registration> {
        let mut errors = FieldErrors::new();

        let personal_info = self
            .draft
            .personal_info
            .check(ctx)
            .map_err(|e| errors.merge(e))
            .ok();
        let address = self
            .draft
            .address
            .check(ctx)
            .map_err(|e| errors.merge(e))
            .ok();
        let contract = if self.plan.contains(StepKind::Contract) {
            self.draft
                .contract
                .check(ctx)
                .map_err(|e| errors.merge(e))
                .ok()
        } else {
            None
        };

        match (personal_info, address) {
            (Some(personal_info), Some(address)) if errors.is_empty() => Ok(Registration {
                personal_info,
                address,
                contract,
            }),
            _ => Err(errors),
        }
    }

    async fn submit(&mut self, ctx: &ValidationContext) -> Result<AdvanceOutcome, WizardError> {
        let registration = self.registration(ctx).map_err(WizardError::Invalid)?;

        match self.service.submit(registration).await {
            Ok(stored) => {
                info!(id = %stored.id, "Registration submitted");
                self.draft = RegistrationDraft::new();
                self.current = self.plan.len().saturating_sub(1);
                self.phase = Phase::Submitted(stored.clone());
                Ok(AdvanceOutcome::Submitted(stored))
            }
            Err(err) => {
                warn!(code = err.code(), "Registration submission failed");
                self.phase = Phase::Failed(err.user_message());
                Err(WizardError::Submission(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MockRegistrationService;

    fn wizard() -> Wizard {
        Wizard::new(
            StepPlan::standard(true),
            Arc::new(MockRegistrationService::new()),
        )
    }

    #[test]
    fn test_starts_on_first_step() {
        let wizard = wizard();

        assert_eq!(
            wizard.state(),
            WizardState::Step {
                index: 0,
                kind: StepKind::PersonalInfo
            }
        );
        assert!(wizard.draft().is_empty());
    }

    #[test]
    fn test_retreat_saturates_at_first_step() {
        let mut wizard = wizard();

        wizard.retreat();
        wizard.retreat();

        assert_eq!(wizard.current_index(), 0);
    }

    #[test]
    fn test_bind_does_not_validate() {
        let mut wizard = wizard();

        wizard
            .bind_address(AddressInput {
                postal_code: "123".to_string(),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(wizard.draft().address.postal_code, "123");
        assert_eq!(wizard.current_index(), 0);
    }

    #[test]
    fn test_wizard_error_to_app_error() {
        let mut fields = FieldErrors::new();
        fields.add("email", "Please enter a valid email address");

        let err: AppError = WizardError::Invalid(fields).into();
        assert_eq!(err.code(), "VALIDATION_ERROR");

        let err: AppError = WizardError::Finished.into();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
