//! Registration service configuration.

use common::config::{env_or, env_parse_or};
use domain::{DEFAULT_PHONE_NUMBERS_TABLE, DEFAULT_REGISTRATIONS_TABLE};

/// Registration service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationServiceConfig {
    /// Table completed registrations are inserted into
    pub registrations_table: String,
    /// Table used by the phone-number diagnostics
    pub phone_numbers_table: String,
    /// Whether new wizards include the contract step
    pub show_contract_step: bool,
}

impl RegistrationServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            registrations_table: env_or("REGISTRATIONS_TABLE", &defaults.registrations_table),
            phone_numbers_table: env_or("PHONE_NUMBERS_TABLE", &defaults.phone_numbers_table),
            show_contract_step: env_parse_or("SHOW_CONTRACT_STEP", defaults.show_contract_step),
        }
    }
}

impl Default for RegistrationServiceConfig {
    fn default() -> Self {
        Self {
            registrations_table: DEFAULT_REGISTRATIONS_TABLE.to_string(),
            phone_numbers_table: DEFAULT_PHONE_NUMBERS_TABLE.to_string(),
            show_contract_step: true,
        }
    }
}
