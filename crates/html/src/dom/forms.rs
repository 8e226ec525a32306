//! Form-control state: live values, checkedness, and the boolean attributes
//! (`required`, `disabled`) the validators toggle.

use super::Document;
use indextree::NodeId;

const CONTROL_TAGS: [&str; 3] = ["input", "select", "textarea"];

impl Document {
    /// Whether `node` is an `input`, `select` or `textarea`.
    pub fn is_form_control(&self, node: NodeId) -> bool {
        self.tag(node).is_some_and(|tag| CONTROL_TAGS.contains(&tag))
    }

    /// Lowercase `type` of an input, defaulting to `text`.
    pub fn input_type(&self, node: NodeId) -> String {
        self.attribute(node, "type")
            .map_or_else(|| String::from("text"), str::to_ascii_lowercase)
    }

    /// Current value of a control: the live value if the user (or a script)
    /// changed it, otherwise the default taken from the markup.
    pub fn value(&self, node: NodeId) -> String {
        if let Some(live) = self.node(node).and_then(|data| data.value.clone()) {
            return live;
        }
        match self.tag(node) {
            Some("textarea") => self.text_content(node),
            Some("select") => self.default_select_value(node),
            Some("input") if matches!(self.input_type(node).as_str(), "checkbox" | "radio") => self
                .attribute(node, "value")
                .unwrap_or("on")
                .to_owned(),
            _ => self.attribute(node, "value").unwrap_or_default().to_owned(),
        }
    }

    fn default_select_value(&self, select: NodeId) -> String {
        let options: Vec<NodeId> = self
            .descendant_elements(select)
            .into_iter()
            .filter(|node| self.is_tag(*node, "option"))
            .collect();
        let chosen = options
            .iter()
            .copied()
            .find(|option| self.has_attribute(*option, "selected"))
            .or_else(|| options.first().copied());
        chosen.map_or_else(String::new, |option| self.option_value(option))
    }

    fn option_value(&self, option: NodeId) -> String {
        self.attribute(option, "value").map_or_else(
            || self.text_content(option).trim().to_owned(),
            str::to_owned,
        )
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(data) = self.node_mut(node) {
            data.value = Some(value.to_owned());
        }
    }

    pub fn checked(&self, node: NodeId) -> bool {
        self.node(node)
            .and_then(|data| data.checked)
            .unwrap_or_else(|| self.has_attribute(node, "checked"))
    }

    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(data) = self.node_mut(node) {
            data.checked = Some(checked);
        }
    }

    pub fn required(&self, node: NodeId) -> bool {
        self.has_attribute(node, "required")
    }

    pub fn set_required(&mut self, node: NodeId, required: bool) {
        self.set_flag(node, "required", required);
    }

    pub fn disabled(&self, node: NodeId) -> bool {
        self.has_attribute(node, "disabled")
    }

    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        self.set_flag(node, "disabled", disabled);
    }

    fn set_flag(&mut self, node: NodeId, name: &str, on: bool) {
        if on {
            self.set_attribute(node, name, "");
        } else {
            self.remove_attribute(node, name);
        }
    }

    /// Controls owned by `form`, in document order.
    pub fn form_controls(&self, form: NodeId) -> Vec<NodeId> {
        self.descendant_elements(form)
            .into_iter()
            .filter(|node| self.is_form_control(*node))
            .collect()
    }

    /// `(name, value)` pairs for every control of `form`, keyed by `name`
    /// or, failing that, `id`. Unnamed controls are skipped.
    pub fn form_data(&self, form: NodeId) -> Vec<(String, String)> {
        self.form_controls(form)
            .into_iter()
            .filter_map(|control| {
                let key = self
                    .attribute(control, "name")
                    .filter(|name| !name.is_empty())
                    .or_else(|| self.attribute(control, "id"))?;
                Some((key.to_owned(), self.value(control)))
            })
            .collect()
    }

    /// Restore every control of `form` to its markup default.
    pub fn reset_form(&mut self, form: NodeId) {
        for control in self.form_controls(form) {
            if let Some(data) = self.node_mut(control) {
                data.value = None;
                data.checked = None;
            }
        }
    }
}
