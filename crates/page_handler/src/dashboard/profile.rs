//! The "editar perfil" form.

use anyhow::Result;
use chrono::NaiveDate;
use html::{Document, NodeId};
use validation::rules::MIN_PASSWORD_LEN;
use validation::{Rule, messages};

use crate::feedback::{self, Field, field_label};

const PASSWORD: &str = "contrasena";
const PASSWORD_CONFIRMATION: &str = "confirmarContrasena";
const BIRTH_DATE: &str = "fechaNacimiento";

fn rules_for(doc: &Document, input: NodeId, today: NaiveDate) -> Result<Vec<Rule>> {
    let mut rules = Vec::new();
    if doc.required(input) {
        rules.push(Rule::required(field_label(doc, input)?));
    }
    match doc.attribute(input, "name").unwrap_or_default() {
        "nombre" => rules.push(Rule::min_length(2, messages::NAME_TOO_SHORT)),
        "email" => rules.push(Rule::Email),
        "telefono" => rules.push(Rule::Phone),
        PASSWORD => rules.push(Rule::min_length(MIN_PASSWORD_LEN, messages::PASSWORD_TOO_SHORT)),
        BIRTH_DATE => rules.push(Rule::PlausibleBirthDate { today }),
        _ => {}
    }
    Ok(rules)
}

/// Validate one profile control with the rules its name and `required`
/// attribute call for.
///
/// # Errors
/// Returns an error on DOM failures.
pub fn validate_patient_field(doc: &mut Document, input: NodeId, today: NaiveDate) -> Result<bool> {
    let Some(field) = Field::beside(doc, input) else {
        return Ok(false);
    };
    let rules = rules_for(doc, input, today)?;
    feedback::validate_field(doc, &field, &rules)
}

/// Validate every required control, a filled-in birth date, and the password
/// confirmation. All failures are shown, not just the first.
///
/// # Errors
/// Returns an error on DOM failures.
pub fn validate_patient_form(doc: &mut Document, form: NodeId, today: NaiveDate) -> Result<bool> {
    let mut inputs = doc.query_selector_all(form, "[required]")?;
    let birth = doc.query_selector(form, &format!(r#"input[name="{BIRTH_DATE}"]"#))?;
    if let Some(birth) = birth.filter(|node| !doc.value(*node).is_empty()) {
        if !inputs.contains(&birth) {
            inputs.push(birth);
        }
    }

    let mut valid = true;
    for input in inputs {
        valid &= validate_patient_field(doc, input, today)?;
    }

    let password = doc.query_selector(form, &format!(r#"input[name="{PASSWORD}"]"#))?;
    let confirmation = doc.query_selector(form, &format!(r#"input[name="{PASSWORD_CONFIRMATION}"]"#))?;
    if let (Some(password), Some(confirmation)) = (password, confirmation) {
        let rule = Rule::Matches {
            other: doc.value(password),
        };
        if let Some(message) = rule.check(&doc.value(confirmation)).message() {
            if let Some(field) = Field::beside(doc, confirmation) {
                feedback::show_error(doc, &field, message)?;
            }
            valid = false;
        }
    }
    Ok(valid)
}
