//! Step 1: personal information.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::MIN_REGISTRATION_AGE;
use crate::validation::{
    age_in_years, parse_date, FieldErrors, StepSchema, Validation, ValidationContext,
};

/// Raw personal information as entered by the applicant.
///
/// Every field defaults to empty so that missing input is reported per
/// field instead of failing deserialization. Passwords are accepted but
/// never serialized back out.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfoInput {
    #[validate(email(message = "Please enter a valid email address"))]
    #[cfg_attr(feature = "openapi", schema(example = "a@b.com"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[serde(skip_serializing)]
    #[cfg_attr(feature = "openapi", schema(min_length = 8))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    #[serde(skip_serializing)]
    pub password_confirm: String,

    #[validate(length(min = 2, message = "First name must be at least 2 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "Jo"))]
    pub first_name: String,

    #[validate(length(min = 2, message = "Last name must be at least 2 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "Doe"))]
    pub last_name: String,

    #[cfg_attr(feature = "openapi", schema(example = "2000-01-01"))]
    pub date_of_birth: String,
}

impl std::fmt::Debug for PersonalInfoInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonalInfoInput")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("password_confirm", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("date_of_birth", &self.date_of_birth)
            .finish()
    }
}

/// Validated personal information.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalInfo {
    pub email: String,
    /// Plain text; hashed when the registration row is built.
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

impl std::fmt::Debug for PersonalInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonalInfo")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("date_of_birth", &self.date_of_birth)
            .finish()
    }
}

impl PersonalInfoInput {
    /// Copy with surrounding whitespace removed and the email lowercased.
    /// Passwords are kept verbatim.
    pub fn normalized(&self) -> Self {
        Self {
            email: self.email.trim().to_lowercase(),
            password: self.password.clone(),
            password_confirm: self.password_confirm.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            date_of_birth: self.date_of_birth.trim().to_string(),
        }
    }
}

impl StepSchema for PersonalInfoInput {
    type Output = PersonalInfo;

    /// Rules apply to the normalized values, which are also what the
    /// typed result carries.
    fn check(&self, ctx: &ValidationContext) -> Validation<PersonalInfo> {
        let input = self.normalized();
        let mut errors = match input.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from_validator(&e),
        };

        let date_of_birth = match parse_date(&input.date_of_birth) {
            Some(born) if age_in_years(born, ctx.today) >= MIN_REGISTRATION_AGE => Some(born),
            Some(_) => {
                errors.add(
                    "dateOfBirth",
                    format!("You must be at least {} years old", MIN_REGISTRATION_AGE),
                );
                None
            }
            None => {
                errors.add("dateOfBirth", "Please enter a valid date of birth");
                None
            }
        };

        match date_of_birth {
            Some(date_of_birth) if errors.is_empty() => Ok(PersonalInfo {
                email: input.email,
                password: input.password,
                first_name: input.first_name,
                last_name: input.last_name,
                date_of_birth,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ValidationContext {
        ValidationContext::new(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
    }

    fn valid_input() -> PersonalInfoInput {
        PersonalInfoInput {
            email: "a@b.com".to_string(),
            password: "abcdefgh".to_string(),
            password_confirm: "abcdefgh".to_string(),
            first_name: "Jo".to_string(),
            last_name: "Doe".to_string(),
            date_of_birth: "2000-01-01".to_string(),
        }
    }

    #[test]
    fn test_valid_personal_info() {
        let info = valid_input().check(&ctx()).unwrap();

        assert_eq!(info.email, "a@b.com");
        assert_eq!(info.first_name, "Jo");
        assert_eq!(
            info.date_of_birth,
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_invalid_email() {
        let input = PersonalInfoInput {
            email: "not-an-email".to_string(),
            ..valid_input()
        };

        let errors = input.check(&ctx()).unwrap_err();
        assert!(errors.contains("email"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_short_password() {
        let input = PersonalInfoInput {
            password: "abc".to_string(),
            password_confirm: "abc".to_string(),
            ..valid_input()
        };

        let errors = input.check(&ctx()).unwrap_err();
        assert!(errors.contains("password"));
        assert!(!errors.contains("passwordConfirm"));
    }

    #[test]
    fn test_mismatch_reported_on_confirmation_only() {
        let input = PersonalInfoInput {
            password_confirm: "abcdefgX".to_string(),
            ..valid_input()
        };

        let errors = input.check(&ctx()).unwrap_err();
        assert_eq!(errors.get("passwordConfirm"), Some("Passwords do not match"));
        assert!(!errors.contains("password"));
    }

    #[test]
    fn test_short_names() {
        let input = PersonalInfoInput {
            first_name: "J".to_string(),
            last_name: "D".to_string(),
            ..valid_input()
        };

        let errors = input.check(&ctx()).unwrap_err();
        assert!(errors.contains("firstName"));
        assert!(errors.contains("lastName"));
    }

    #[test]
    fn test_padded_names_checked_after_trimming() {
        let input = PersonalInfoInput {
            first_name: " J".to_string(),
            last_name: "  ".to_string(),
            ..valid_input()
        };

        let errors = input.check(&ctx()).unwrap_err();
        assert_eq!(
            errors.get("firstName"),
            Some("First name must be at least 2 characters")
        );
        assert!(errors.contains("lastName"));
    }

    #[test]
    fn test_padded_values_stored_trimmed() {
        let input = PersonalInfoInput {
            email: "  A@B.com ".to_string(),
            first_name: "  Jo ".to_string(),
            last_name: "Doe\t".to_string(),
            date_of_birth: " 2000-01-01 ".to_string(),
            ..valid_input()
        };

        let info = input.check(&ctx()).unwrap();
        assert_eq!(info.email, "a@b.com");
        assert_eq!(info.first_name, "Jo");
        assert_eq!(info.last_name, "Doe");
    }

    #[test]
    fn test_password_whitespace_kept() {
        let input = PersonalInfoInput {
            password: " abcdefg ".to_string(),
            password_confirm: " abcdefg ".to_string(),
            ..valid_input()
        };

        let info = input.check(&ctx()).unwrap();
        assert_eq!(info.password, " abcdefg ");
    }

    #[test]
    fn test_names_count_characters_not_bytes() {
        let input = PersonalInfoInput {
            first_name: "Żo".to_string(),
            ..valid_input()
        };

        assert!(input.check(&ctx()).is_ok());
    }

    #[test]
    fn test_underage_rejected() {
        let input = PersonalInfoInput {
            date_of_birth: "2010-01-01".to_string(),
            ..valid_input()
        };

        let errors = input.check(&ctx()).unwrap_err();
        assert_eq!(
            errors.get("dateOfBirth"),
            Some("You must be at least 18 years old")
        );
    }

    #[test]
    fn test_unparseable_date() {
        let input = PersonalInfoInput {
            date_of_birth: "yesterday".to_string(),
            ..valid_input()
        };

        let errors = input.check(&ctx()).unwrap_err();
        assert_eq!(
            errors.get("dateOfBirth"),
            Some("Please enter a valid date of birth")
        );
    }

    #[test]
    fn test_empty_input_reports_every_field() {
        let errors = PersonalInfoInput::default().check(&ctx()).unwrap_err();

        for field in ["email", "password", "firstName", "lastName", "dateOfBirth"] {
            assert!(errors.contains(field), "missing error for {}", field);
        }
    }

    #[test]
    fn test_missing_json_fields_deserialize_to_defaults() {
        let input: PersonalInfoInput =
            serde_json::from_value(serde_json::json!({ "email": "a@b.com" })).unwrap();

        assert_eq!(input.email, "a@b.com");
        assert!(input.password.is_empty());
    }

    #[test]
    fn test_passwords_never_serialized() {
        let json = serde_json::to_value(valid_input()).unwrap();

        assert!(json.get("password").is_none());
        assert!(json.get("passwordConfirm").is_none());
        assert_eq!(json["firstName"], "Jo");
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let debug = format!("{:?}", valid_input());
        assert!(!debug.contains("abcdefgh"));
    }
}
