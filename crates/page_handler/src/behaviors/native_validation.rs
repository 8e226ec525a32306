use anyhow::Result;

use crate::component::{Component, Context};
use crate::constraints::{control_is_valid, form_is_valid};
use crate::events::Event;

/// Bridges the browser's own constraint validation to Bootstrap's styling.
///
/// An invalid form is kept from submitting and every submitted form gets
/// `was-validated`. Typing into a control inside a form toggles
/// `is-valid` / `is-invalid` from that control's constraints alone.
#[derive(Copy, Clone, Debug, Default)]
pub struct NativeValidation;

impl Component for NativeValidation {
    fn name(&self) -> &'static str {
        "native-validation"
    }

    fn handle_event(&mut self, cx: &mut Context<'_>, event: &Event) -> Result<()> {
        match *event {
            Event::Submit { form } => {
                if !form_is_valid(cx.doc(), form) {
                    cx.prevent_default();
                }
                cx.doc_mut().add_class(form, "was-validated");
            }
            Event::Input { target } => {
                let doc = cx.doc();
                if !doc.is_form_control(target) || doc.closest(target, "form")?.is_none() {
                    return Ok(());
                }
                let (add, remove) = if control_is_valid(doc, target) {
                    ("is-valid", "is-invalid")
                } else {
                    ("is-invalid", "is-valid")
                };
                cx.doc_mut().remove_class(target, remove);
                cx.doc_mut().add_class(target, add);
            }
            _ => {}
        }
        Ok(())
    }
}
