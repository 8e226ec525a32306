//! The reservation form and the reservations table.

use anyhow::Result;
use chrono::NaiveDate;
use html::{Document, NodeId};
use log::debug;
use validation::{DateFormat, Rule, convert_date_format, format_date};

use crate::feedback::{self, Field, field_label};

pub const PENDING: &str = "Pendiente";
pub const TABLE_BODY: &str = "#reservasHistorial .table tbody";

/// One row of the reservations table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reservation {
    /// `yyyy-mm-dd`, as the date input reports it.
    pub fecha: String,
    pub hora: String,
    pub especialista: String,
    pub estado: String,
}

impl Reservation {
    pub fn pending(fecha: &str, hora: &str, especialista: &str) -> Self {
        Self {
            fecha: fecha.to_owned(),
            hora: hora.to_owned(),
            especialista: especialista.to_owned(),
            estado: PENDING.to_owned(),
        }
    }

    /// New pending reservation from submitted form fields.
    pub fn from_fields(fields: &[(String, String)]) -> Self {
        let field = |name: &str| {
            fields
                .iter()
                .find(|(key, _)| key == name)
                .map_or("", |(_, value)| value.as_str())
        };
        Self::pending(field("fecha"), field("hora"), field("especialista"))
    }

    /// Date as shown in the table. Unparsable dates are shown as entered.
    pub fn display_date(&self) -> String {
        format_date(&self.fecha, DateFormat::DayMonthYear).unwrap_or_else(|err| {
            debug!("keeping reservation date as entered: {err:#}");
            self.fecha.clone()
        })
    }
}

/// Texts of the `td` cells of `row`.
pub fn row_cells(doc: &Document, row: NodeId) -> Vec<String> {
    doc.element_children(row)
        .into_iter()
        .filter(|cell| doc.is_tag(*cell, "td"))
        .map(|cell| doc.text_content(cell).trim().to_owned())
        .collect()
}

fn append_cell(doc: &mut Document, row: NodeId, text: &str) -> Result<NodeId> {
    let cell = doc.append_element(row, "td")?;
    doc.set_text_content(cell, text)?;
    Ok(cell)
}

fn append_action(doc: &mut Document, cell: NodeId, class: &str, title: &str, icon: &str) -> Result<()> {
    let button = doc.append_element(cell, "button")?;
    doc.set_class_name(button, &format!("btn btn-sm {class}"));
    doc.set_attribute(button, "title", title);
    let glyph = doc.append_element(button, "i")?;
    doc.set_class_name(glyph, &format!("fas {icon}"));
    Ok(())
}

/// Append a row for `reservation` with edit and delete actions. Returns
/// `None` when the page has no reservations table.
///
/// # Errors
/// Returns an error on DOM failures.
pub fn add_reservation_to_table(doc: &mut Document, reservation: &Reservation) -> Result<Option<NodeId>> {
    let Some(body) = doc.select(TABLE_BODY)? else {
        debug!("no reservations table to add to");
        return Ok(None);
    };
    let row = doc.append_element(body, "tr")?;
    append_cell(doc, row, &reservation.display_date())?;
    append_cell(doc, row, &reservation.hora)?;
    append_cell(doc, row, &reservation.especialista)?;
    append_cell(doc, row, &reservation.estado)?;
    let actions = doc.append_element(row, "td")?;
    append_action(doc, actions, "btn-success", "Editar", "fa-edit")?;
    append_action(doc, actions, "btn-danger", "Eliminar", "fa-trash-alt")?;
    Ok(Some(row))
}

/// # Errors
/// Returns an error on DOM failures.
pub fn validate_reservation_field(doc: &mut Document, input: NodeId) -> Result<bool> {
    let Some(field) = Field::beside(doc, input) else {
        return Ok(false);
    };
    let mut rules = Vec::new();
    if doc.required(input) {
        rules.push(Rule::required(field_label(doc, input)?));
    }
    feedback::validate_field(doc, &field, &rules)
}

/// Every required control must be filled and the date must not be in the
/// past.
///
/// # Errors
/// Returns an error on DOM failures.
pub fn validate_reservation_form(doc: &mut Document, form: NodeId, today: NaiveDate) -> Result<bool> {
    let mut valid = true;
    for input in doc.query_selector_all(form, "[required]")? {
        valid &= validate_reservation_field(doc, input)?;
    }

    if let Some(date) = doc.query_selector(form, r#"input[type="date"]"#)? {
        let value = doc.value(date);
        if !value.is_empty() {
            if let Some(message) = (Rule::NotInPast { today }).check(&value).message() {
                if let Some(field) = Field::beside(doc, date) {
                    feedback::show_error(doc, &field, message)?;
                }
                valid = false;
            }
        }
    }
    Ok(valid)
}

/// Copy `row` back into the reservation form for editing.
///
/// # Errors
/// Returns an error if the form cannot be queried.
pub fn fill_form_from_row(doc: &mut Document, form: NodeId, row: NodeId) -> Result<()> {
    let cells = row_cells(doc, row);
    let [fecha, hora, especialista, ..] = cells.as_slice() else {
        debug!("reservation row {row} has too few cells");
        return Ok(());
    };
    let date_input = doc.query_selector(form, r#"input[type="date"]"#)?;
    let time_input = doc.query_selector(form, r#"input[type="time"]"#)?;
    let specialist = doc.query_selector(form, "select")?;
    if let Some(input) = date_input {
        doc.set_value(input, &convert_date_format(fecha));
    }
    if let Some(input) = time_input {
        doc.set_value(input, hora);
    }
    if let Some(select) = specialist {
        doc.set_value(select, especialista);
    }
    Ok(())
}

/// Question asked before cancelling the reservation in `row`.
pub fn cancel_prompt(doc: &Document, row: NodeId) -> String {
    let cells = row_cells(doc, row);
    let fecha = cells.first().map_or("", String::as_str);
    let especialista = cells.get(2).map_or("", String::as_str);
    format!("¿Estás seguro de que quieres cancelar la cita con {especialista} del {fecha}?")
}
