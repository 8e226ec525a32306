//! Field-level validation feedback in Bootstrap's style.
//!
//! A field shows at most one of `is-valid` / `is-invalid`. Error text goes
//! into the field's feedback container: a server-rendered `.invalid-feedback`
//! node is reused, otherwise a `div.invalid-feedback.d-block` is generated.
//! Only generated nodes are removed when the field is cleared, which makes
//! validation idempotent.

use anyhow::Result;
use html::{Document, NodeId};
use log::debug;
use validation::{Rule, messages, validate};

const VALID: &str = "is-valid";
const INVALID: &str = "is-invalid";
const FEEDBACK: &str = "invalid-feedback";
const GENERATED: &str = "d-block";

/// A form control and the node its error messages are rendered into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub control: NodeId,
    pub container: NodeId,
}

impl Field {
    pub const fn new(control: NodeId, container: NodeId) -> Self {
        Self { control, container }
    }

    /// Field whose feedback lives in the control's parent element.
    pub fn beside(doc: &Document, control: NodeId) -> Option<Self> {
        let parent = doc.parent(control).filter(|parent| doc.tag(*parent).is_some());
        if parent.is_none() {
            debug!("control {control} has no parent element for feedback");
        }
        Some(Self::new(control, parent?))
    }

    pub fn value(&self, doc: &Document) -> String {
        doc.value(self.control)
    }

    pub fn name<'doc>(&self, doc: &'doc Document) -> Option<&'doc str> {
        doc.attribute(self.control, "name")
    }
}

fn feedback_node(doc: &Document, field: &Field) -> Result<Option<NodeId>> {
    doc.query_selector(field.container, &format!(".{FEEDBACK}"))
}

/// Drop the validity classes and any generated error node.
///
/// # Errors
/// Returns an error if the feedback container cannot be queried.
pub fn clear(doc: &mut Document, field: &Field) -> Result<()> {
    doc.remove_class(field.control, VALID);
    doc.remove_class(field.control, INVALID);
    if let Some(feedback) = feedback_node(doc, field)? {
        if doc.has_class(feedback, GENERATED) {
            doc.remove(feedback);
        }
    }
    Ok(())
}

/// Mark the field invalid and render `message`.
///
/// # Errors
/// Returns an error if the error node cannot be written.
pub fn show_error(doc: &mut Document, field: &Field, message: &str) -> Result<()> {
    clear(doc, field)?;
    doc.add_class(field.control, INVALID);
    if let Some(feedback) = feedback_node(doc, field)? {
        return doc.set_text_content(feedback, message);
    }
    let error_node = doc.create_element("div");
    doc.set_class_name(error_node, &format!("{FEEDBACK} {GENERATED}"));
    doc.set_text_content(error_node, message)?;
    doc.append_child(field.container, error_node)
}

/// Mark the field valid.
///
/// # Errors
/// Returns an error if the feedback container cannot be queried.
pub fn show_success(doc: &mut Document, field: &Field) -> Result<()> {
    clear(doc, field)?;
    doc.add_class(field.control, VALID);
    Ok(())
}

/// Clear the field, then check its current value against `rules` in order.
/// The first failure is rendered and `false` returned.
///
/// # Errors
/// Returns an error only for DOM failures; a rule violation is `Ok(false)`.
pub fn validate_field(doc: &mut Document, field: &Field, rules: &[Rule]) -> Result<bool> {
    let value = field.value(doc);
    match validate(&value, rules).message() {
        Some(message) => {
            show_error(doc, field, message)?;
            Ok(false)
        }
        None => {
            show_success(doc, field)?;
            Ok(true)
        }
    }
}

/// Text of the `label` in the control's `.mb-3` group, without the required
/// marker. Falls back to "Este campo".
///
/// # Errors
/// Returns an error if the document cannot be queried.
pub fn field_label(doc: &Document, control: NodeId) -> Result<String> {
    let Some(group) = doc.closest(control, ".mb-3")? else {
        return Ok(messages::FALLBACK_LABEL.to_owned());
    };
    Ok(doc.query_selector(group, "label")?.map_or_else(
        || messages::FALLBACK_LABEL.to_owned(),
        |label| doc.text_content(label).replace('*', "").trim().to_owned(),
    ))
}
