//! Field validation for submitted user records.
//!
//! Each field has its own validator returning either the accepted value or
//! the list of violated rules. A failed "required" rule short-circuits the
//! remaining rules for that field; otherwise every failing rule is reported.
//! Lengths are counted in characters on the value as submitted; email syntax
//! is checked on the trimmed value.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value, json};
use validator::ValidateEmail;

use super::Nationality;

/// Maximum length of a first or last name.
pub const NAME_MAX: usize = 50;
/// Maximum length of an email address.
pub const EMAIL_MAX: usize = 100;

/// Wire names used as keys in validation reports.
pub mod fields {
    /// `firstName`
    pub const FIRST_NAME: &str = "firstName";
    /// `lastName`
    pub const LAST_NAME: &str = "lastName";
    /// `email`
    pub const EMAIL: &str = "email";
    /// `nationality`
    pub const NATIONALITY: &str = "nationality";
    /// `totalScore`
    pub const TOTAL_SCORE: &str = "totalScore";
}

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_regex() -> &'static Regex {
    NAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        Regex::new(r"^[a-zA-Z\s]+$")
            .unwrap_or_else(|error| panic!("name regex failed to compile: {error}"))
    })
}

/// Messages for one of the two name fields.
struct NameMessages {
    required: &'static str,
    too_long: &'static str,
    invalid_characters: &'static str,
}

const FIRST_NAME_MESSAGES: NameMessages = NameMessages {
    required: "First name is required",
    too_long: "First name cannot exceed 50 characters",
    invalid_characters: "First name can only contain letters and spaces",
};

const LAST_NAME_MESSAGES: NameMessages = NameMessages {
    required: "Last name is required",
    too_long: "Last name cannot exceed 50 characters",
    invalid_characters: "Last name can only contain letters and spaces",
};

fn validate_name(value: Option<&str>, messages: &NameMessages) -> Result<(), Vec<&'static str>> {
    let Some(value) = value.filter(|raw| !raw.trim().is_empty()) else {
        return Err(vec![messages.required]);
    };

    let mut violations = Vec::new();
    if value.chars().count() > NAME_MAX {
        violations.push(messages.too_long);
    }
    if !name_regex().is_match(value) {
        violations.push(messages.invalid_characters);
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Validate a submitted first name.
pub fn validate_first_name(value: Option<&str>) -> Result<(), Vec<&'static str>> {
    validate_name(value, &FIRST_NAME_MESSAGES)
}

/// Validate a submitted last name.
pub fn validate_last_name(value: Option<&str>) -> Result<(), Vec<&'static str>> {
    validate_name(value, &LAST_NAME_MESSAGES)
}

/// Validate a submitted email address.
pub fn validate_email(value: Option<&str>) -> Result<(), Vec<&'static str>> {
    let Some(value) = value.filter(|raw| !raw.trim().is_empty()) else {
        return Err(vec!["Email is required"]);
    };

    let mut violations = Vec::new();
    if !value.trim().validate_email() {
        violations.push("Invalid email format");
    }
    if value.chars().count() > EMAIL_MAX {
        violations.push("Email cannot exceed 100 characters");
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Validate a submitted nationality code, returning the accepted value.
pub fn validate_nationality(value: Option<&str>) -> Result<Nationality, Vec<&'static str>> {
    let Some(code) = value else {
        return Err(vec!["Nationality is required"]);
    };
    Nationality::from_code(code).ok_or_else(|| vec!["Nationality must be a valid country code"])
}

/// Validate a submitted total score, returning the accepted value.
pub fn validate_total_score(value: Option<f64>) -> Result<f64, Vec<&'static str>> {
    let Some(score) = value else {
        return Err(vec!["Total score is required"]);
    };
    if score.is_finite() && score >= 0.0 {
        Ok(score)
    } else {
        Err(vec!["Total score must be a positive number"])
    }
}

/// Violations for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Wire name of the offending field.
    pub field: &'static str,
    /// Every rule the field failed, in evaluation order.
    pub messages: Vec<&'static str>,
}

/// Accumulated violations across all submitted fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Record the outcome of a field validator, keeping the accepted value.
    pub fn check<T>(&mut self, field: &'static str, outcome: Result<T, Vec<&'static str>>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(messages) => {
                self.fields.push(FieldViolation { field, messages });
                None
            }
        }
    }

    /// True when no field failed validation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Violations in field submission order.
    #[must_use]
    pub fn fields(&self) -> &[FieldViolation] {
        &self.fields
    }

    /// Messages recorded for `field`, if any.
    #[must_use]
    pub fn messages_for(&self, field: &str) -> Option<&[&'static str]> {
        self.fields
            .iter()
            .find(|violation| violation.field == field)
            .map(|violation| violation.messages.as_slice())
    }

    /// Render as `{ "errors": { field: [messages] } }` for error details.
    #[must_use]
    pub fn to_details(&self) -> Value {
        let errors: Map<String, Value> = self
            .fields
            .iter()
            .map(|violation| (violation.field.to_owned(), json!(violation.messages)))
            .collect();
        json!({ "errors": errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn blank_names_only_report_required(#[case] value: Option<&str>) {
        assert_eq!(
            validate_first_name(value),
            Err(vec!["First name is required"])
        );
    }

    #[rstest]
    #[case("Ada")]
    #[case("Mary Ann")]
    #[case(" Grace ")]
    fn names_with_letters_and_spaces_pass(#[case] value: &str) {
        assert_eq!(validate_last_name(Some(value)), Ok(()));
    }

    #[test]
    fn long_name_with_digits_reports_both_rules() {
        let value = format!("{}9", "a".repeat(NAME_MAX));
        assert_eq!(
            validate_last_name(Some(&value)),
            Err(vec![
                "Last name cannot exceed 50 characters",
                "Last name can only contain letters and spaces",
            ])
        );
    }

    #[test]
    fn name_at_limit_passes() {
        assert_eq!(validate_first_name(Some(&"a".repeat(NAME_MAX))), Ok(()));
    }

    #[rstest]
    #[case("not-an-email")]
    #[case("a@")]
    #[case("@b.com")]
    fn malformed_emails_are_rejected(#[case] value: &str) {
        assert_eq!(validate_email(Some(value)), Err(vec!["Invalid email format"]));
    }

    #[test]
    fn overlong_email_is_rejected() {
        let value = format!("{}@example.com", "a".repeat(EMAIL_MAX));
        let violations = validate_email(Some(&value)).expect_err("too long");
        assert!(violations.contains(&"Email cannot exceed 100 characters"));
    }

    #[test]
    fn valid_email_passes() {
        assert_eq!(validate_email(Some("ada@example.com")), Ok(()));
    }

    #[rstest]
    #[case(Some(-1.0), false)]
    #[case(Some(f64::NAN), false)]
    #[case(Some(f64::INFINITY), false)]
    #[case(Some(0.0), true)]
    #[case(Some(12.5), true)]
    fn total_score_must_be_non_negative(#[case] value: Option<f64>, #[case] accepted: bool) {
        assert_eq!(validate_total_score(value).is_ok(), accepted);
    }

    #[test]
    fn missing_nationality_is_required() {
        assert_eq!(
            validate_nationality(None),
            Err(vec!["Nationality is required"])
        );
    }

    #[test]
    fn report_renders_errors_map() {
        let mut errors = ValidationErrors::default();
        let _ = errors.check(fields::FIRST_NAME, validate_first_name(Some(" ")));
        let score = errors.check(fields::TOTAL_SCORE, validate_total_score(Some(3.0)));

        assert_eq!(score, Some(3.0));
        assert_eq!(
            errors.to_details(),
            json!({ "errors": { "firstName": ["First name is required"] } })
        );
    }
}
