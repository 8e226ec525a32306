//! Inline `style` declarations and host-measured geometry.

use super::Document;
use indextree::NodeId;

/// Vertical geometry of an element as measured by the host, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutBox {
    /// Distance from the top of the document.
    pub top: f64,
    pub height: f64,
}

fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_ascii_lowercase(), value.trim().to_owned()))
        })
        .collect()
}

fn serialize_declarations(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

impl Document {
    pub fn style_property(&self, node: NodeId, name: &str) -> Option<String> {
        let style = self.attribute(node, "style")?;
        parse_declarations(style)
            .into_iter()
            .find(|(prop, _)| prop.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Set one inline declaration, keeping the others in place.
    pub fn set_style_property(&mut self, node: NodeId, name: &str, value: &str) {
        let mut decls = self
            .attribute(node, "style")
            .map(parse_declarations)
            .unwrap_or_default();
        let name_lc = name.to_ascii_lowercase();
        if let Some(slot) = decls.iter_mut().find(|(prop, _)| *prop == name_lc) {
            value.clone_into(&mut slot.1);
        } else {
            decls.push((name_lc, value.to_owned()));
        }
        self.set_attribute(node, "style", &serialize_declarations(&decls));
    }

    pub fn layout_box(&self, node: NodeId) -> Option<LayoutBox> {
        self.node(node).and_then(|data| data.layout)
    }

    /// Record the host's measurement for `node`.
    pub fn set_layout_box(&mut self, node: NodeId, layout: LayoutBox) {
        if let Some(data) = self.node_mut(node) {
            data.layout = Some(layout);
        }
    }

    /// Measured height, or zero for elements the host never measured.
    pub fn offset_height(&self, node: NodeId) -> f64 {
        self.layout_box(node).map_or(0.0, |layout| layout.height)
    }
}
