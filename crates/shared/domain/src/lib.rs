//! Domain layer - Registration entities and the Validation Rule Set.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Step inputs are validated by [`StepSchema::check`], which never fails on
//! malformed input: it returns either the typed value or a [`FieldErrors`]
//! map keyed by wire field name.

pub mod address;
pub mod constants;
pub mod contract;
pub mod error;
pub mod password;
pub mod personal_info;
pub mod phone_number;
pub mod registration;
pub mod validation;

pub use address::{is_postal_code, Address, AddressInput};
pub use constants::*;
pub use contract::{Contract, ContractInput};
pub use error::{DomainError, DomainResult};
pub use password::Password;
pub use personal_info::{PersonalInfo, PersonalInfoInput};
pub use phone_number::PhoneNumberRecord;
pub use registration::{NewRegistration, Registration, RegistrationDraft, StoredRegistration};
pub use validation::{
    age_in_years, parse_date, FieldErrors, StepSchema, Validation, ValidationContext,
};
