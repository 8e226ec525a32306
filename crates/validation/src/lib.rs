//! Field validation rules and display formatting for Mediconecta forms.
//!
//! Everything here is a pure function of its inputs: rules take the field
//! value (and, for date rules, the current date) and produce a
//! [`ValidationResult`]. Rendering the result is the page runtime's job.

#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]

pub mod dates;
pub mod format;
pub mod medical;
pub mod messages;
pub mod rules;
pub mod shape;

pub use dates::{is_not_in_past, is_plausible_birth_date, parse_iso_date};
pub use format::{DateFormat, TimeFormat, convert_date_format, format_date, format_time};
pub use medical::{FormReport, MedicalForm, validate_medical_form};
pub use rules::{Rule, ValidationResult, validate};
pub use shape::{is_valid_email, is_valid_phone};
