//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Personal information
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum length for first and last names
pub const MIN_NAME_LENGTH: usize = 2;

/// Minimum age (in whole years) required to register
pub const MIN_REGISTRATION_AGE: i64 = 18;

/// Average Gregorian year length in days, used for age computation
pub const AVERAGE_GREGORIAN_YEAR_DAYS: f64 = 365.2425;

/// Accepted date format for dates of birth
pub const DATE_OF_BIRTH_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Address
// =============================================================================

/// Minimum street length requirement
pub const MIN_STREET_LENGTH: usize = 5;

/// Number of ASCII digits in a postal code
pub const POSTAL_CODE_LENGTH: usize = 5;

/// Minimum city length requirement
pub const MIN_CITY_LENGTH: usize = 2;

/// Minimum nationality length requirement
pub const MIN_NATIONALITY_LENGTH: usize = 2;

// =============================================================================
// Tables
// =============================================================================

/// Default table for completed registrations
pub const DEFAULT_REGISTRATIONS_TABLE: &str = "registrations";

/// Default table for diagnostic phone number rows
pub const DEFAULT_PHONE_NUMBERS_TABLE: &str = "phone_numbers";
