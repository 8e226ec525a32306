//! Medical-condition checkboxes and their detail inputs.

use html::{Document, NodeId};
use log::debug;

pub const CONDITION_CHECKBOX: &str = "afeccion-checkbox";

/// Show and require `#detalle-{value}` while `checkbox` is checked; hide,
/// clear and un-require it otherwise. Returns the detail input, if any.
pub fn toggle_condition_detail(doc: &mut Document, checkbox: NodeId) -> Option<NodeId> {
    let value = doc.value(checkbox);
    let Some(detail) = doc.get_element_by_id(&format!("detalle-{value}")) else {
        debug!("no detail input for condition {value:?}");
        return None;
    };
    if doc.checked(checkbox) {
        doc.remove_class(detail, "d-none");
        doc.set_required(detail, true);
    } else {
        doc.add_class(detail, "d-none");
        doc.set_required(detail, false);
        doc.set_value(detail, "");
    }
    Some(detail)
}
