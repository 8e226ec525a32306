//! Whole-form check for the medical contact form.

use crate::messages;
use crate::shape::{is_valid_email, is_valid_phone};

/// Values of the medical contact form. Empty strings stand for missing fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MedicalForm {
    pub nombre: String,
    pub email: String,
    pub telefono: String,
}

/// Every failure found in a form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormReport {
    pub errors: Vec<String>,
}

impl FormReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Name of two or more characters, a well-formed email, and, when given, a
/// well-formed phone. Unlike field validation this collects all failures.
pub fn validate_medical_form(form: &MedicalForm) -> FormReport {
    let mut errors = Vec::new();
    if form.nombre.trim().chars().count() < 2 {
        errors.push(messages::NAME_TOO_SHORT.to_owned());
    }
    if !is_valid_email(&form.email) {
        errors.push(messages::EMAIL_REQUIRED.to_owned());
    }
    if !form.telefono.is_empty() && !is_valid_phone(&form.telefono) {
        errors.push(messages::PHONE_INVALID.to_owned());
    }
    FormReport { errors }
}
