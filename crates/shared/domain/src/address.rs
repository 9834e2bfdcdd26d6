//! Step 2: postal address.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{FieldErrors, StepSchema, Validation, ValidationContext};

/// Exactly five ASCII digits.
static POSTAL_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{5}$").expect("postal code pattern compiles"));

/// Raw address as entered by the applicant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct AddressInput {
    #[validate(length(min = 5, message = "Street must be at least 5 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "Main St 1"))]
    pub street: String,

    #[validate(regex(path = *POSTAL_CODE, message = "Postal code must be exactly 5 digits"))]
    #[cfg_attr(feature = "openapi", schema(example = "10115"))]
    pub postal_code: String,

    #[validate(length(min = 2, message = "City must be at least 2 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "Berlin"))]
    pub city: String,

    #[validate(length(min = 2, message = "Nationality must be at least 2 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "DE"))]
    pub nationality: String,
}

/// Validated address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub nationality: String,
}

/// True if `value` is exactly five ASCII digits.
pub fn is_postal_code(value: &str) -> bool {
    POSTAL_CODE.is_match(value)
}

impl AddressInput {
    /// Copy with surrounding whitespace removed from every field.
    pub fn normalized(&self) -> Self {
        Self {
            street: self.street.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            city: self.city.trim().to_string(),
            nationality: self.nationality.trim().to_string(),
        }
    }
}

impl StepSchema for AddressInput {
    type Output = Address;

    fn check(&self, _ctx: &ValidationContext) -> Validation<Address> {
        let input = self.normalized();
        let errors = match input.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from_validator(&e),
        };

        errors.into_result(Address {
            street: input.street,
            postal_code: input.postal_code,
            city: input.city,
            nationality: input.nationality,
        })
    }
}
