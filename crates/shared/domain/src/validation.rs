//! Validation Rule Set plumbing shared by every wizard step.
//!
//! Each step input implements [`StepSchema`]: a pure, total check that turns
//! raw input into a typed value or a map of per-field messages. Nothing here
//! panics or errors on malformed input.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use crate::constants::{AVERAGE_GREGORIAN_YEAR_DAYS, DATE_OF_BIRTH_FORMAT};

/// Result of validating a step: the typed value, or every failing field.
pub type Validation<T> = Result<T, FieldErrors>;

/// Field name (camelCase, as sent on the wire) to the first failing message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field. The first message per field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Fold another error map into this one, keeping existing messages.
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, message) in other.0 {
            self.add(field, message);
        }
    }

    /// `Ok(value)` if no field failed, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Validation<T> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    /// Collect derive-level errors, keyed by wire name.
    pub fn from_validator(errors: &ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            let field: &str = field.as_ref();
            let name = camel_case(field);
            let message = errs
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("{} is invalid", name));
            out.add(name, message);
        }
        out
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}

/// Inputs that the checks depend on besides the step data itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    /// Reference date for age computation
    pub today: NaiveDate,
}

impl ValidationContext {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Context anchored at the current UTC date.
    pub fn now() -> Self {
        Self::new(Utc::now().date_naive())
    }
}

/// A step's declarative rule set.
pub trait StepSchema {
    type Output;

    /// Check every rule and return the typed value or all failing fields.
    fn check(&self, ctx: &ValidationContext) -> Validation<Self::Output>;
}

/// Convert a Rust field name into the wire name (`postal_code` -> `postalCode`).
pub fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Parse a date of birth given as `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_OF_BIRTH_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}

/// Whole years elapsed between `born` and `today`, using the average
/// Gregorian year length. Negative for dates in the future.
pub fn age_in_years(born: NaiveDate, today: NaiveDate) -> i64 {
    let days = (today - born).num_days() as f64;
    (days / AVERAGE_GREGORIAN_YEAR_DAYS).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("postal_code"), "postalCode");
        assert_eq!(camel_case("password_confirm"), "passwordConfirm");
        assert_eq!(camel_case("email"), "email");
        assert_eq!(camel_case("dateOfBirth"), "dateOfBirth");
    }

    #[test]
    fn test_first_message_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.add("email", "first");
        errors.add("email", "second");

        assert_eq!(errors.get("email"), Some("first"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_into_result() {
        assert_eq!(FieldErrors::new().into_result(7), Ok(7));

        let mut errors = FieldErrors::new();
        errors.add("city", "too short");
        assert!(errors.into_result(7).is_err());
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let mut errors = FieldErrors::new();
        errors.add("postalCode", "Postal code must be exactly 5 digits");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "postalCode": "Postal code must be exactly 5 digits" })
        );
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2000-01-01"), Some(date(2000, 1, 1)));
        assert_eq!(
            parse_date("2000-01-01T10:00:00Z"),
            Some(date(2000, 1, 1))
        );
        assert_eq!(parse_date("01/01/2000"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2000-02-30"), None);
    }

    #[test]
    fn test_age_in_years() {
        let today = date(2024, 6, 15);

        assert_eq!(age_in_years(date(2000, 1, 1), today), 24);
        assert_eq!(age_in_years(date(2006, 6, 14), today), 18);
        assert_eq!(age_in_years(date(2006, 6, 20), today), 17);
        assert!(age_in_years(date(2030, 1, 1), today) < 0);
    }
}
