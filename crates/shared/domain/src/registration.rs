//! Registration draft, validated aggregate, and persisted row shapes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::address::{Address, AddressInput};
use crate::contract::{Contract, ContractInput};
use crate::error::DomainResult;
use crate::password::Password;
use crate::personal_info::{PersonalInfo, PersonalInfoInput};

/// In-progress, not-yet-persisted wizard data.
///
/// Each section holds whatever the applicant last entered for that step,
/// valid or not. The draft lives only as long as its wizard session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationDraft {
    pub personal_info: PersonalInfoInput,
    pub address: AddressInput,
    pub contract: ContractInput,
}

impl RegistrationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if nothing has been entered yet.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Fully validated registration, ready to persist.
///
/// `contract` is `None` when the wizard ran without a contract step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub personal_info: PersonalInfo,
    pub address: Address,
    pub contract: Option<Contract>,
}

impl Registration {
    /// Build the row to insert. The password is hashed here and the
    /// plain text is dropped.
    pub fn into_record(self) -> DomainResult<NewRegistration> {
        let password_hash = Password::new(&self.personal_info.password)?.into_string();
        let PersonalInfo {
            email,
            first_name,
            last_name,
            date_of_birth,
            ..
        } = self.personal_info;
        let Address {
            street,
            postal_code,
            city,
            nationality,
        } = self.address;

        let (contract_id, accept_terms, signature_data) = match self.contract {
            Some(contract) => (Some(contract.contract_id), true, contract.signature_data),
            None => (None, false, None),
        };

        Ok(NewRegistration {
            id: Uuid::new_v4(),
            email,
            password_hash,
            first_name,
            last_name,
            date_of_birth,
            street,
            postal_code,
            city,
            nationality,
            contract_id,
            accept_terms,
            signature_data,
            created_at: Utc::now(),
        })
    }
}

/// Row inserted into the registrations table (snake_case columns).
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewRegistration {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub nationality: String,
    pub contract_id: Option<String>,
    pub accept_terms: bool,
    pub signature_data: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for NewRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewRegistration")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("contract_id", &self.contract_id)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Registration as read back from storage (safe to return to clients).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StoredRegistration {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub contract_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<NewRegistration> for StoredRegistration {
    fn from(row: NewRegistration) -> Self {
        Self {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            contract_id: row.contract_id,
            created_at: row.created_at,
        }
    }
}
