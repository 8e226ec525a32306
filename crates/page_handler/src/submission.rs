//! Per-form submission state machine.
//!
//! `Idle -> Validating -> (Invalid -> Idle) | (Valid -> Submitting -> Done)`.
//! While a form is `Submitting` its submit button is disabled and shows a
//! spinner; further submits are swallowed. The outcome of a submission goes
//! through a [`SubmissionBackend`].

use core::cell::RefCell;
use core::time::Duration;
use std::rc::Rc;

use anyhow::Result;
use html::{Document, NodeId};
use log::debug;

use crate::component::Context;
use crate::window::Window;

const ORIGINAL_TEXT: &str = "data-original-text";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Invalid,
    Valid,
    Submitting,
    Done,
}

/// Busy indicator on a form's submit button.
pub struct SubmitButton;

impl SubmitButton {
    /// The submit button of `form`.
    ///
    /// # Errors
    /// Returns an error if the form cannot be queried.
    pub fn find(doc: &Document, form: NodeId) -> Result<Option<NodeId>> {
        doc.query_selector(form, r#"button[type="submit"]"#)
    }

    /// Disable `button` and replace its label with a spinner and `message`.
    /// The original label is kept in `data-original-text`; a button that is
    /// already busy keeps the label it had before the first call.
    ///
    /// # Errors
    /// Returns an error if the new label cannot be attached.
    pub fn busy(doc: &mut Document, button: NodeId, message: &str) -> Result<()> {
        doc.set_disabled(button, true);
        if !doc.has_attribute(button, ORIGINAL_TEXT) {
            let original = doc.inner_html(button);
            doc.set_attribute(button, ORIGINAL_TEXT, &original);
        }
        doc.clear_children(button);
        let spinner = doc.append_element(button, "i")?;
        doc.set_class_name(spinner, "fas fa-spinner fa-spin me-2");
        let label = doc.create_text(message);
        doc.append_child(button, label)
    }

    /// Undo [`SubmitButton::busy`]. Returns `false` if the button was not busy.
    ///
    /// # Errors
    /// Returns an error if the original label cannot be parsed back.
    pub fn restore(doc: &mut Document, button: NodeId) -> Result<bool> {
        let Some(original) = doc.attribute(button, ORIGINAL_TEXT).map(str::to_owned) else {
            return Ok(false);
        };
        doc.set_disabled(button, false);
        doc.set_inner_html(button, &original)?;
        doc.remove_attribute(button, ORIGINAL_TEXT);
        Ok(true)
    }
}

/// What a component hands to its backend once the busy period ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub form: NodeId,
    pub action: Option<String>,
    pub fields: Vec<(String, String)>,
}

impl SubmissionRequest {
    pub fn from_form(doc: &Document, form: NodeId) -> Self {
        Self {
            form,
            action: doc.attribute(form, "action").map(str::to_owned),
            fields: doc.form_data(form),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Decides the outcome of a submission.
pub trait SubmissionBackend {
    /// # Errors
    /// A rejected submission. The message is shown to the user.
    fn submit(&mut self, request: &SubmissionRequest) -> Result<()>;
}

/// Accepts every submission and keeps a shared log of them.
#[derive(Clone, Debug, Default)]
pub struct SimulatedBackend {
    accepted: Rc<RefCell<Vec<SubmissionRequest>>>,
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests accepted so far, across every clone of this backend.
    pub fn accepted(&self) -> Vec<SubmissionRequest> {
        self.accepted.borrow().clone()
    }
}

impl SubmissionBackend for SimulatedBackend {
    fn submit(&mut self, request: &SubmissionRequest) -> Result<()> {
        debug!("simulated backend accepted {} fields", request.fields.len());
        self.accepted.borrow_mut().push(request.clone());
        Ok(())
    }
}

/// Submission state of one form.
#[derive(Clone, Debug)]
pub struct SubmissionFlow {
    name: &'static str,
    busy_message: &'static str,
    delay: Duration,
    token: u64,
    state: SubmissionState,
    form: Option<NodeId>,
    button: Option<NodeId>,
}

impl SubmissionFlow {
    /// `token` is the timer token the owning component receives when the
    /// busy period of `delay` ends.
    pub const fn new(name: &'static str, busy_message: &'static str, delay: Duration, token: u64) -> Self {
        Self {
            name,
            busy_message,
            delay,
            token,
            state: SubmissionState::Idle,
            form: None,
            button: None,
        }
    }

    pub const fn state(&self) -> SubmissionState {
        self.state
    }

    pub const fn token(&self) -> u64 {
        self.token
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    fn transition(&mut self, next: SubmissionState) {
        debug!("{}: {:?} -> {:?}", self.name, self.state, next);
        self.state = next;
    }

    /// Handle a `submit` of `form`. The native submission is always
    /// prevented; `validate` decides whether the busy period starts.
    /// Returns the state the flow settled in.
    ///
    /// # Errors
    /// Propagates DOM failures from `validate` or from the busy indicator.
    pub fn begin(
        &mut self,
        cx: &mut Context<'_>,
        form: NodeId,
        validate: impl FnOnce(&mut Window) -> Result<bool>,
    ) -> Result<SubmissionState> {
        cx.prevent_default();
        if self.is_submitting() {
            debug!("{}: submit ignored while submitting", self.name);
            return Ok(self.state);
        }

        self.transition(SubmissionState::Validating);
        let valid = validate(cx.window_mut()).inspect_err(|_| self.state = SubmissionState::Idle)?;
        if !valid {
            self.transition(SubmissionState::Invalid);
            self.transition(SubmissionState::Idle);
            return Ok(self.state);
        }

        self.transition(SubmissionState::Valid);
        self.button = SubmitButton::find(cx.doc(), form)?;
        if let Some(button) = self.button {
            SubmitButton::busy(cx.doc_mut(), button, self.busy_message)?;
        }
        self.form = Some(form);
        cx.set_timeout(self.delay, self.token);
        self.transition(SubmissionState::Submitting);
        Ok(self.state)
    }

    /// End the busy period: restore the button and move to `Done`. Returns the
    /// submitted form, or `None` if no submission was in flight.
    ///
    /// # Errors
    /// Returns an error if the button label cannot be restored.
    pub fn complete(&mut self, doc: &mut Document) -> Result<Option<NodeId>> {
        if !self.is_submitting() {
            debug!("{}: stale completion in {:?}", self.name, self.state);
            return Ok(None);
        }
        if let Some(button) = self.button.take() {
            SubmitButton::restore(doc, button)?;
        }
        self.transition(SubmissionState::Done);
        Ok(self.form.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use html::parse_document;

    #[test]
    fn busy_then_restore_round_trips_the_label() -> Result<()> {
        let mut doc = parse_document(
            r#"<form id="f"><button type="submit"><i class="fas fa-save"></i> Guardar</button></form>"#,
        )?;
        let form = doc.get_element_by_id("f").ok_or_else(|| anyhow!("no form"))?;
        let button = SubmitButton::find(&doc, form)?.ok_or_else(|| anyhow!("no button"))?;
        let before = doc.inner_html(button);

        SubmitButton::busy(&mut doc, button, "Guardando cambios...")?;
        SubmitButton::busy(&mut doc, button, "Guardando cambios...")?;
        assert!(doc.disabled(button));
        assert_eq!(doc.text_content(button), "Guardando cambios...");
        assert!(doc.query_selector(button, "i.fa-spinner")?.is_some());

        assert!(SubmitButton::restore(&mut doc, button)?);
        assert!(!doc.disabled(button));
        assert_eq!(doc.inner_html(button), before);
        assert!(!SubmitButton::restore(&mut doc, button)?);
        Ok(())
    }

    #[test]
    fn simulated_backend_shares_its_log() -> Result<()> {
        let backend = SimulatedBackend::new();
        let mut handle = backend.clone();
        let doc = parse_document(r#"<form id="f" action="/reservar"><input name="hora" value="10:00"></form>"#)?;
        let form = doc.get_element_by_id("f").ok_or_else(|| anyhow!("no form"))?;
        handle.submit(&SubmissionRequest::from_form(&doc, form))?;
        let accepted = backend.accepted();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].field("hora"), Some("10:00"));
        assert_eq!(accepted[0].action.as_deref(), Some("/reservar"));
        Ok(())
    }
}
