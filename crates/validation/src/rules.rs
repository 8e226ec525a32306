//! Validation rules evaluated against a single field value.

use chrono::NaiveDate;

use crate::dates::{is_not_in_past, is_plausible_birth_date, parse_iso_date};
use crate::messages;
use crate::shape::{is_valid_email, is_valid_phone};

/// Minimum password length accepted by the login and profile forms.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(message) => Some(message),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// A single check over a field value.
///
/// Every rule except `Required`, `Password` and `Matches` passes on an empty
/// value: emptiness is `Required`'s concern, so optional fields stay optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Trimmed value must be non-empty.
    Required { label: String },
    /// Trimmed value must have at least `min` characters.
    MinLength { min: usize, message: String },
    Email,
    Phone,
    /// Raw value must be present and at least [`MIN_PASSWORD_LEN`] long.
    Password,
    /// Raw value must equal `other` (password confirmation).
    Matches { other: String },
    /// A `yyyy-mm-dd` date on or after `today`.
    NotInPast { today: NaiveDate },
    /// A `yyyy-mm-dd` birth date giving an age of 0 to 150 years.
    PlausibleBirthDate { today: NaiveDate },
}

impl Rule {
    pub fn required(label: impl Into<String>) -> Self {
        Self::Required {
            label: label.into(),
        }
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Self::MinLength {
            min,
            message: message.into(),
        }
    }

    pub fn check(&self, value: &str) -> ValidationResult {
        let trimmed = value.trim();
        match self {
            Self::Required { label } => {
                if trimmed.is_empty() {
                    return ValidationResult::invalid(messages::required(label));
                }
            }
            Self::MinLength { min, message } => {
                if !trimmed.is_empty() && trimmed.chars().count() < *min {
                    return ValidationResult::invalid(message.as_str());
                }
            }
            Self::Email => {
                if !trimmed.is_empty() && !is_valid_email(trimmed) {
                    return ValidationResult::invalid(messages::EMAIL_INVALID);
                }
            }
            Self::Phone => {
                if !trimmed.is_empty() && !is_valid_phone(trimmed) {
                    return ValidationResult::invalid(messages::PHONE_INVALID);
                }
            }
            Self::Password => {
                if value.is_empty() {
                    return ValidationResult::invalid(messages::PASSWORD_REQUIRED);
                }
                if value.chars().count() < MIN_PASSWORD_LEN {
                    return ValidationResult::invalid(messages::PASSWORD_TOO_SHORT);
                }
            }
            Self::Matches { other } => {
                if value != other {
                    return ValidationResult::invalid(messages::PASSWORDS_DIFFER);
                }
            }
            Self::NotInPast { today } => {
                if !trimmed.is_empty() {
                    match parse_iso_date(trimmed) {
                        Ok(date) if is_not_in_past(date, *today) => {}
                        Ok(_) => return ValidationResult::invalid(messages::DATE_IN_PAST),
                        Err(_) => return ValidationResult::invalid(messages::DATE_INVALID),
                    }
                }
            }
            Self::PlausibleBirthDate { today } => {
                if !trimmed.is_empty() {
                    let plausible = parse_iso_date(trimmed)
                        .is_ok_and(|birth| is_plausible_birth_date(birth, *today));
                    if !plausible {
                        return ValidationResult::invalid(messages::BIRTH_DATE_INVALID);
                    }
                }
            }
        }
        ValidationResult::Valid
    }
}

/// Evaluate `rules` in order and stop at the first failure.
pub fn validate(value: &str, rules: &[Rule]) -> ValidationResult {
    rules
        .iter()
        .map(|rule| rule.check(value))
        .find(|result| !result.is_valid())
        .unwrap_or(ValidationResult::Valid)
}
