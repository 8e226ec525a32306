//! Login page: username and password checks on blur, and a guarded submit
//! that shows a busy button before handing the form to the user agent.

use std::collections::BTreeMap;

use anyhow::Result;
use html::{Document, NodeId};
use log::{debug, info, warn};
use validation::{Rule, messages};

use crate::alerts::{AlertPresenter, Severity};
use crate::component::{Component, Context};
use crate::config::PageConfig;
use crate::events::Event;
use crate::feedback::{self, Field};
use crate::submission::{SubmissionBackend, SubmissionFlow, SubmissionRequest};
use crate::window::Window;

const LOGIN_TIMER: u64 = 1;
const BUSY_MESSAGE: &str = "Iniciando sesión...";

pub struct LoginForm {
    alerts: AlertPresenter,
    backend: Box<dyn SubmissionBackend>,
    flow: SubmissionFlow,
    form: Option<NodeId>,
    username: Option<NodeId>,
    password: Option<NodeId>,
}

fn validate_inputs(doc: &mut Document, username: Option<NodeId>, password: Option<NodeId>) -> Result<bool> {
    let username_ok = match username {
        Some(input) => LoginForm::validate_username(doc, input)?,
        None => {
            warn!("login form has no username field; treating it as invalid");
            false
        }
    };
    let password_ok = match password {
        Some(input) => LoginForm::validate_password(doc, input)?,
        None => {
            warn!("login form has no password field; treating it as invalid");
            false
        }
    };
    Ok(username_ok && password_ok)
}

impl LoginForm {
    pub fn new(config: &PageConfig, alerts: AlertPresenter, backend: Box<dyn SubmissionBackend>) -> Self {
        Self {
            alerts,
            backend,
            flow: SubmissionFlow::new("login", BUSY_MESSAGE, config.login_delay(), LOGIN_TIMER),
            form: None,
            username: None,
            password: None,
        }
    }

    pub fn flow(&self) -> &SubmissionFlow {
        &self.flow
    }

    fn wire(&mut self, doc: &Document) -> Result<()> {
        self.form = doc.select("form")?;
        if self.form.is_none() {
            debug!("no login form on this page");
            return Ok(());
        }
        self.username = doc.select(r#"input[name="username"]"#)?;
        self.password = doc.select(r#"input[name="password"]"#)?;
        Ok(())
    }

    /// A username is any non-blank value.
    ///
    /// # Errors
    /// Returns an error on DOM failures.
    pub fn validate_username(doc: &mut Document, input: NodeId) -> Result<bool> {
        let Some(field) = Field::beside(doc, input) else {
            return Ok(false);
        };
        if field.value(doc).trim().is_empty() {
            feedback::show_error(doc, &field, messages::USERNAME_REQUIRED)?;
            return Ok(false);
        }
        feedback::show_success(doc, &field)?;
        Ok(true)
    }

    /// A password must be present and at least six characters long.
    ///
    /// # Errors
    /// Returns an error on DOM failures.
    pub fn validate_password(doc: &mut Document, input: NodeId) -> Result<bool> {
        match Field::beside(doc, input) {
            Some(field) => feedback::validate_field(doc, &field, &[Rule::Password]),
            None => Ok(false),
        }
    }

    /// Validate both fields, showing feedback on each. A missing field makes
    /// the form invalid.
    ///
    /// # Errors
    /// Returns an error on DOM failures.
    pub fn validate_login_form(&self, doc: &mut Document) -> Result<bool> {
        validate_inputs(doc, self.username, self.password)
    }

    /// Show the first server-side error of every named field.
    ///
    /// # Errors
    /// Returns an error on DOM failures.
    pub fn handle_server_errors(doc: &mut Document, errors: &BTreeMap<String, Vec<String>>) -> Result<()> {
        for (name, field_errors) in errors {
            let Some(first) = field_errors.first() else {
                continue;
            };
            let selector = format!(r#"[name="{name}"]"#);
            let Some(input) = doc.select(&selector)? else {
                debug!("server error for unknown field {name}");
                continue;
            };
            if let Some(field) = Field::beside(doc, input) {
                feedback::show_error(doc, &field, first)?;
            }
        }
        Ok(())
    }

    /// # Errors
    /// Returns an error if the banner cannot be attached.
    pub fn show_success_message(&self, window: &mut Window, message: &str) -> Result<()> {
        self.alerts.show_default(window, message, Severity::Success).map(drop)
    }

    /// # Errors
    /// Returns an error if the banner cannot be attached.
    pub fn show_error_message(&self, window: &mut Window, message: &str) -> Result<()> {
        self.alerts.show_default(window, message, Severity::Danger).map(drop)
    }

    fn is_login_field(&self, target: NodeId) -> bool {
        Some(target) == self.username || Some(target) == self.password
    }
}

impl Component for LoginForm {
    fn name(&self) -> &'static str {
        "login-form"
    }

    fn handle_event(&mut self, cx: &mut Context<'_>, event: &Event) -> Result<()> {
        match *event {
            Event::DomContentLoaded => self.wire(cx.doc()),
            Event::Blur { target } if Some(target) == self.username => {
                Self::validate_username(cx.doc_mut(), target).map(drop)
            }
            Event::Blur { target } if Some(target) == self.password => {
                Self::validate_password(cx.doc_mut(), target).map(drop)
            }
            Event::Input { target } if self.is_login_field(target) => {
                match Field::beside(cx.doc(), target) {
                    Some(field) => feedback::clear(cx.doc_mut(), &field),
                    None => Ok(()),
                }
            }
            Event::Submit { form } if Some(form) == self.form => {
                let (username, password) = (self.username, self.password);
                self.flow
                    .begin(cx, form, |window| {
                        validate_inputs(window.document_mut(), username, password)
                    })
                    .map(drop)
            }
            _ => Ok(()),
        }
    }

    fn on_timer(&mut self, cx: &mut Context<'_>, token: u64) -> Result<()> {
        if token != LOGIN_TIMER {
            return Ok(());
        }
        let Some(form) = self.flow.complete(cx.doc_mut())? else {
            return Ok(());
        };
        let request = SubmissionRequest::from_form(cx.doc(), form);
        match self.backend.submit(&request) {
            Ok(()) => {
                info!("login form submitted");
                cx.window_mut().submit_form(form);
                Ok(())
            }
            Err(err) => self.show_error_message(cx.window_mut(), &err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentId;
    use crate::submission::SimulatedBackend;
    use anyhow::anyhow;
    use html::parse_document;

    const PAGE: &str = r#"<form>
        <div class="mb-3"><input name="username" id="u"></div>
        <div class="mb-3"><input name="password" id="p" value="abc12"></div>
        <button type="submit">Entrar</button>
        </form>"#;

    fn wired(markup: &str) -> Result<(LoginForm, Window)> {
        let config = PageConfig::default();
        let mut window = Window::new(parse_document(markup)?, config.clone())?;
        let mut form = LoginForm::new(&config, AlertPresenter::default(), Box::new(SimulatedBackend::new()));
        let mut cx = Context::new(&mut window, ComponentId::new(0));
        form.handle_event(&mut cx, &Event::DomContentLoaded)?;
        Ok((form, window))
    }

    #[test]
    fn empty_username_and_short_password() -> Result<()> {
        let (form, mut window) = wired(PAGE)?;
        let doc = window.document_mut();
        assert!(!form.validate_login_form(doc)?);

        for id in ["u", "p"] {
            let input = doc.get_element_by_id(id).ok_or_else(|| anyhow!("no #{id}"))?;
            assert!(doc.has_class(input, "is-invalid"), "#{id}");
        }
        assert_eq!(doc.select_all(".invalid-feedback")?.len(), 2);
        let shown: Vec<String> = doc
            .select_all(".invalid-feedback")?
            .into_iter()
            .map(|node| doc.text_content(node))
            .collect();
        assert_eq!(shown, vec![messages::USERNAME_REQUIRED, messages::PASSWORD_TOO_SHORT]);
        Ok(())
    }

    #[test]
    fn missing_password_field_fails_the_form() -> Result<()> {
        let (form, mut window) = wired(r#"<form><div><input name="username" value="ana"></div></form>"#)?;
        let doc = window.document_mut();
        assert!(!form.validate_login_form(doc)?);
        // the username that is there still gets its feedback
        assert_eq!(doc.select_all("input.is-valid")?.len(), 1);
        assert!(doc.select(".invalid-feedback")?.is_none());
        Ok(())
    }

    #[test]
    fn blank_username_is_required() -> Result<()> {
        let (_, mut window) = wired(PAGE)?;
        let doc = window.document_mut();
        let input = doc.get_element_by_id("u").ok_or_else(|| anyhow!("no #u"))?;
        doc.set_value(input, "   ");
        assert!(!LoginForm::validate_username(doc, input)?);
        assert_eq!(doc.select_all(".invalid-feedback")?.len(), 1);
        let message = doc.select(".invalid-feedback")?.ok_or_else(|| anyhow!("no feedback"))?;
        assert_eq!(doc.text_content(message), messages::USERNAME_REQUIRED);

        doc.set_value(input, "ana");
        assert!(LoginForm::validate_username(doc, input)?);
        assert!(doc.has_class(input, "is-valid"));
        assert!(doc.select(".invalid-feedback")?.is_none());
        Ok(())
    }
}
