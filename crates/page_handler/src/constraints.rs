//! The subset of HTML constraint validation the site forms rely on:
//! `required`, `type=email`, `minlength` and `maxlength`.

use html::{Document, NodeId};
use validation::is_valid_email;

fn length_attr(doc: &Document, control: NodeId, name: &str) -> Option<usize> {
    doc.attribute(control, name)?.trim().parse().ok()
}

/// `checkValidity()` for a single control. Disabled controls are barred from
/// validation and always pass.
pub fn control_is_valid(doc: &Document, control: NodeId) -> bool {
    if !doc.is_form_control(control) || doc.disabled(control) {
        return true;
    }
    let kind = doc.input_type(control);
    let is_input = doc.is_tag(control, "input");
    if is_input && matches!(kind.as_str(), "submit" | "button" | "reset" | "hidden") {
        return true;
    }
    if is_input && matches!(kind.as_str(), "checkbox" | "radio") {
        return !doc.required(control) || doc.checked(control);
    }

    let value = doc.value(control);
    if value.is_empty() {
        return !doc.required(control);
    }
    if is_input && kind == "email" && !is_valid_email(&value) {
        return false;
    }
    let length = value.chars().count();
    if length_attr(doc, control, "minlength").is_some_and(|min| length < min) {
        return false;
    }
    !length_attr(doc, control, "maxlength").is_some_and(|max| length > max)
}

/// `checkValidity()` for a whole form.
pub fn form_is_valid(doc: &Document, form: NodeId) -> bool {
    doc.form_controls(form)
        .into_iter()
        .all(|control| control_is_valid(doc, control))
}
