//! Patient dashboard: profile editing, reservations and medical conditions.

mod conditions;
mod profile;
mod reservations;

pub use conditions::{CONDITION_CHECKBOX, toggle_condition_detail};
pub use profile::{validate_patient_field, validate_patient_form};
pub use reservations::{
    PENDING, Reservation, add_reservation_to_table, cancel_prompt, fill_form_from_row, row_cells,
    validate_reservation_field, validate_reservation_form,
};

use core::time::Duration;
use std::collections::BTreeMap;

use anyhow::Result;
use html::NodeId;
use log::{debug, info};

use crate::alerts::{AlertPresenter, Severity};
use crate::component::{Component, Context};
use crate::config::PageConfig;
use crate::events::Event;
use crate::feedback::{self, Field};
use crate::submission::{SubmissionBackend, SubmissionFlow, SubmissionRequest, SubmitButton};
use crate::window::{ScrollBehavior, ScrollBlock, Window};

const PROFILE_TIMER: u64 = 1;
const RESERVATION_TIMER: u64 = 2;
const FIRST_CANCEL_TIMER: u64 = 16;

const PROFILE_FORM: &str = "#editarPerfil form";
const RESERVATION_FORM: &str = "#reservasHistorial form";

pub const PROFILE_UPDATED: &str = "Perfil actualizado correctamente";
pub const RESERVATION_CREATED: &str = "Reserva creada correctamente";
pub const RESERVATION_CANCELLED: &str = "Cita cancelada correctamente";
pub const LOADED_FOR_EDIT: &str = "Datos cargados para edición";

/// A confirmed cancellation waiting for its busy period to end.
#[derive(Copy, Clone, Debug)]
struct Cancellation {
    row: NodeId,
    button: Option<NodeId>,
}

pub struct PatientDashboard {
    alerts: AlertPresenter,
    backend: Box<dyn SubmissionBackend>,
    cancel_delay: Duration,
    profile: SubmissionFlow,
    reservation: SubmissionFlow,
    profile_form: Option<NodeId>,
    reservation_form: Option<NodeId>,
    table: Option<NodeId>,
    cancellations: BTreeMap<u64, Cancellation>,
    next_cancel: u64,
}

impl PatientDashboard {
    pub fn new(config: &PageConfig, alerts: AlertPresenter, backend: Box<dyn SubmissionBackend>) -> Self {
        Self {
            alerts,
            backend,
            cancel_delay: config.cancel_delay(),
            profile: SubmissionFlow::new(
                "profile",
                "Guardando cambios...",
                config.submit_delay(),
                PROFILE_TIMER,
            ),
            reservation: SubmissionFlow::new(
                "reservation",
                "Procesando reserva...",
                config.submit_delay(),
                RESERVATION_TIMER,
            ),
            profile_form: None,
            reservation_form: None,
            table: None,
            cancellations: BTreeMap::new(),
            next_cancel: FIRST_CANCEL_TIMER,
        }
    }

    pub fn profile_flow(&self) -> &SubmissionFlow {
        &self.profile
    }

    pub fn reservation_flow(&self) -> &SubmissionFlow {
        &self.reservation
    }

    /// Number of confirmed cancellations still in their busy period.
    pub fn pending_cancellations(&self) -> usize {
        self.cancellations.len()
    }

    fn wire(&mut self, cx: &Context<'_>) -> Result<()> {
        let doc = cx.doc();
        self.profile_form = doc.select(PROFILE_FORM)?;
        self.reservation_form = doc.select(RESERVATION_FORM)?;
        self.table = doc.select(".table")?;
        debug!(
            "dashboard wired: profile={:?} reservation={:?} table={:?}",
            self.profile_form, self.reservation_form, self.table
        );
        Ok(())
    }

    fn in_profile_form(&self, cx: &Context<'_>, target: NodeId) -> Result<bool> {
        let doc = cx.doc();
        if self.profile_form.is_none() || !doc.is_form_control(target) {
            return Ok(false);
        }
        Ok(doc.closest(target, "form")? == self.profile_form)
    }

    /// Fill the reservation form from `row` and scroll to it.
    ///
    /// # Errors
    /// Returns an error on DOM failures.
    pub fn edit_reservation(&self, window: &mut Window, row: NodeId) -> Result<()> {
        let Some(form) = self.reservation_form else {
            return Ok(());
        };
        fill_form_from_row(window.document_mut(), form, row)?;
        window.scroll_into_view(form, ScrollBehavior::Smooth, ScrollBlock::Start);
        self.alerts
            .show_default(window, LOADED_FOR_EDIT, Severity::Info)
            .map(drop)
    }

    /// Ask for confirmation and, if given, remove `row` after the cancel
    /// delay. Returns whether the user confirmed.
    ///
    /// # Errors
    /// Returns an error on DOM failures.
    pub fn delete_reservation(&mut self, cx: &mut Context<'_>, row: NodeId) -> Result<bool> {
        let prompt = cancel_prompt(cx.doc(), row);
        if !cx.window_mut().confirm(&prompt) {
            return Ok(false);
        }

        let mut button = None;
        if let Some(form) = self.reservation_form {
            if !self.reservation.is_submitting() {
                button = SubmitButton::find(cx.doc(), form)?;
            }
        }
        if let Some(button) = button {
            SubmitButton::busy(cx.doc_mut(), button, "Cancelando cita...")?;
        }

        let token = self.next_cancel;
        self.next_cancel = self.next_cancel.saturating_add(1);
        self.cancellations.insert(token, Cancellation { row, button });
        cx.set_timeout(self.cancel_delay, token);
        Ok(true)
    }

    fn handle_table_click(&mut self, cx: &mut Context<'_>, target: NodeId) -> Result<()> {
        let Some(table) = self.table else {
            return Ok(());
        };
        let doc = cx.doc();
        let Some(button) = doc.closest(target, "button")? else {
            return Ok(());
        };
        if !doc.ancestor_elements(button).contains(&table) {
            return Ok(());
        }
        let Some(row) = doc.closest(button, "tr")? else {
            return Ok(());
        };
        let action = doc.attribute(button, "title").map(str::to_owned);
        match action.as_deref() {
            Some("Editar") => self.edit_reservation(cx.window_mut(), row),
            Some("Eliminar") => self.delete_reservation(cx, row).map(drop),
            _ => Ok(()),
        }
    }

    fn report(&self, window: &mut Window, outcome: Result<()>, success: &str) -> Result<bool> {
        match outcome {
            Ok(()) => {
                self.alerts.show_default(window, success, Severity::Success)?;
                Ok(true)
            }
            Err(err) => {
                self.alerts
                    .show_default(window, &err.to_string(), Severity::Danger)?;
                Ok(false)
            }
        }
    }

    fn finish_profile(&mut self, cx: &mut Context<'_>) -> Result<()> {
        let Some(form) = self.profile.complete(cx.doc_mut())? else {
            return Ok(());
        };
        let outcome = self.backend.submit(&SubmissionRequest::from_form(cx.doc(), form));
        if self.report(cx.window_mut(), outcome, PROFILE_UPDATED)? {
            cx.window_mut().submit_form(form);
        }
        Ok(())
    }

    fn finish_reservation(&mut self, cx: &mut Context<'_>) -> Result<()> {
        let Some(form) = self.reservation.complete(cx.doc_mut())? else {
            return Ok(());
        };
        let request = SubmissionRequest::from_form(cx.doc(), form);
        let outcome = self.backend.submit(&request);
        if self.report(cx.window_mut(), outcome, RESERVATION_CREATED)? {
            let reservation = Reservation::from_fields(&request.fields);
            if add_reservation_to_table(cx.doc_mut(), &reservation)?.is_some() {
                info!("reservation added for {}", reservation.fecha);
            }
            cx.doc_mut().reset_form(form);
        }
        Ok(())
    }

    fn finish_cancellation(&mut self, cx: &mut Context<'_>, token: u64) -> Result<()> {
        let Some(cancellation) = self.cancellations.remove(&token) else {
            return Ok(());
        };
        if let Some(button) = cancellation.button {
            if !self.reservation.is_submitting() {
                SubmitButton::restore(cx.doc_mut(), button)?;
            }
        }
        if cx.doc().is_attached(cancellation.row) {
            cx.doc_mut().remove(cancellation.row);
        }
        self.alerts
            .show_default(cx.window_mut(), RESERVATION_CANCELLED, Severity::Success)
            .map(drop)
    }
}

impl Component for PatientDashboard {
    fn name(&self) -> &'static str {
        "patient-dashboard"
    }

    fn handle_event(&mut self, cx: &mut Context<'_>, event: &Event) -> Result<()> {
        match *event {
            Event::DomContentLoaded => self.wire(cx),
            Event::Blur { target } if self.in_profile_form(cx, target)? => {
                let today = cx.window().today();
                validate_patient_field(cx.doc_mut(), target, today).map(drop)
            }
            Event::Input { target } if self.in_profile_form(cx, target)? => {
                match Field::beside(cx.doc(), target) {
                    Some(field) => feedback::clear(cx.doc_mut(), &field),
                    None => Ok(()),
                }
            }
            Event::Submit { form } if Some(form) == self.profile_form => self
                .profile
                .begin(cx, form, |window| {
                    let today = window.today();
                    validate_patient_form(window.document_mut(), form, today)
                })
                .map(drop),
            Event::Submit { form } if Some(form) == self.reservation_form => self
                .reservation
                .begin(cx, form, |window| {
                    let today = window.today();
                    validate_reservation_form(window.document_mut(), form, today)
                })
                .map(drop),
            Event::Change { target } if cx.doc().has_class(target, CONDITION_CHECKBOX) => {
                toggle_condition_detail(cx.doc_mut(), target);
                Ok(())
            }
            Event::Click { target } => self.handle_table_click(cx, target),
            _ => Ok(()),
        }
    }

    fn on_timer(&mut self, cx: &mut Context<'_>, token: u64) -> Result<()> {
        match token {
            PROFILE_TIMER => self.finish_profile(cx),
            RESERVATION_TIMER => self.finish_reservation(cx),
            _ => self.finish_cancellation(cx, token),
        }
    }
}
