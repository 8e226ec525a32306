//! Arena-backed DOM tree.
//!
//! Nodes are never freed once created: removing a node only detaches it from
//! its parent. Any `NodeId` handed out by a document therefore stays valid for
//! the document's lifetime, and callers holding a stale id (a pending timer,
//! for instance) can ask [`Document::is_attached`] before acting on it.

mod forms;
mod printing;
mod style;

use anyhow::{Result, anyhow};
use indextree::{Arena, Node, NodeId};
use log::debug;
use smallvec::SmallVec;

pub use style::LayoutBox;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NodeKind {
    #[default]
    Document,
    Element {
        tag: String,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DomNode {
    pub kind: NodeKind,
    pub attrs: SmallVec<(String, String), 4>,
    /// Live value of a form control once it diverges from its markup default.
    value: Option<String>,
    /// Live checkedness of a checkbox or radio once toggled.
    checked: Option<bool>,
    /// Geometry measured by the host; absent until the host reports it.
    layout: Option<LayoutBox>,
}

impl DomNode {
    fn element(tag: &str) -> Self {
        Self {
            kind: NodeKind::Element {
                tag: tag.to_ascii_lowercase(),
            },
            ..Self::default()
        }
    }

    fn text(text: &str) -> Self {
        Self {
            kind: NodeKind::Text {
                text: text.to_owned(),
            },
            ..Self::default()
        }
    }

    /// Lowercase tag name for elements.
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag),
            _ => None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub struct Document {
    arena: Arena<DomNode>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the document node.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(DomNode::default());
        Self { arena, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, node: NodeId) -> Option<&DomNode> {
        self.arena.get(node).map(Node::get)
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut DomNode> {
        self.arena.get_mut(node).map(Node::get_mut)
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.arena.new_node(DomNode::element(tag))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(DomNode::text(text))
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    ///
    /// # Errors
    /// Returns an error if the append would create a cycle or either id does
    /// not belong to this document.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.arena.get(parent).is_none() || self.arena.get(child).is_none() {
            return Err(anyhow!("cannot append {child} to {parent}: unknown node"));
        }
        if parent.ancestors(&self.arena).any(|ancestor| ancestor == child) {
            return Err(anyhow!("cannot append {child} to its own descendant {parent}"));
        }
        child.detach(&mut self.arena);
        parent
            .checked_append(child, &mut self.arena)
            .map_err(|err| anyhow!("cannot append {child} to {parent}: {err:?}"))
    }

    /// Convenience for `create_element` + `append_child`.
    ///
    /// # Errors
    /// Returns an error if `parent` does not belong to this document.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId> {
        let child = self.create_element(tag);
        self.append_child(parent, child)?;
        Ok(child)
    }

    /// Detach `node` (and its subtree) from the tree.
    pub fn remove(&mut self, node: NodeId) {
        if self.arena.get(node).is_some() {
            node.detach(&mut self.arena);
        }
    }

    /// Detach `node` and release it and its subtree from the arena. Ids held
    /// for released nodes stop resolving, even once their slots are reused.
    pub fn free(&mut self, node: NodeId) {
        if node != self.root && self.arena.get(node).is_some() {
            node.remove_subtree(&mut self.arena);
        }
    }

    /// Number of nodes currently held by the arena, attached or not.
    pub fn live_nodes(&self) -> usize {
        self.arena.iter().filter(|node| !node.is_removed()).count()
    }

    /// Whether `node` is still connected to the document root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        if self.arena.get(node).is_none_or(Node::is_removed) {
            return false;
        }
        node.ancestors(&self.arena).any(|ancestor| ancestor == self.root)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node).and_then(Node::parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        if self.arena.get(node).is_none() {
            return Vec::new();
        }
        node.children(&self.arena).collect()
    }

    /// Element children of `node`, in order.
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .into_iter()
            .filter(|child| self.tag(*child).is_some())
            .collect()
    }

    /// Descendant elements of `scope` in document order, excluding `scope`.
    pub fn descendant_elements(&self, scope: NodeId) -> Vec<NodeId> {
        if self.arena.get(scope).is_none() {
            return Vec::new();
        }
        scope
            .descendants(&self.arena)
            .skip(1)
            .filter(|node| self.tag(*node).is_some())
            .collect()
    }

    /// Element ancestors of `node`, nearest first, excluding `node` itself.
    pub fn ancestor_elements(&self, node: NodeId) -> Vec<NodeId> {
        if self.arena.get(node).is_none() {
            return Vec::new();
        }
        node.ancestors(&self.arena)
            .skip(1)
            .filter(|ancestor| self.tag(*ancestor).is_some())
            .collect()
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(DomNode::tag)
    }

    pub fn is_tag(&self, node: NodeId, tag: &str) -> bool {
        self.tag(node).is_some_and(|own| own.eq_ignore_ascii_case(tag))
    }

    /// First element with the given tag, in document order.
    pub fn first_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.descendant_elements(self.root)
            .into_iter()
            .find(|node| self.is_tag(*node, tag))
    }

    pub fn body(&self) -> Option<NodeId> {
        self.first_by_tag("body")
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendant_elements(self.root)
            .into_iter()
            .find(|node| self.attribute(*node, "id") == Some(id))
    }

    // Attributes

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node).and_then(|data| data.attribute(name))
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(data) = self.node_mut(node) else {
            debug!("set_attribute({name}) on unknown node {node}");
            return;
        };
        let name_lc = name.to_ascii_lowercase();
        if let Some(slot) = data.attrs.iter_mut().find(|(key, _)| *key == name_lc) {
            value.clone_into(&mut slot.1);
        } else {
            data.attrs.push((name_lc, value.to_owned()));
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(data) = self.node_mut(node) {
            if let Some(pos) = data
                .attrs
                .iter()
                .position(|(key, _)| key.eq_ignore_ascii_case(name))
            {
                data.attrs.remove(pos);
            }
        }
    }

    // Class list

    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.attribute(node, "class")
            .map(|value| value.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).contains(&class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if self.tag(node).is_none() || self.has_class(node, class) {
            return;
        }
        let mut list: Vec<String> = self.classes(node).into_iter().map(String::from).collect();
        list.push(class.to_owned());
        self.set_attribute(node, "class", &list.join(" "));
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            return;
        }
        let list: Vec<String> = self
            .classes(node)
            .into_iter()
            .filter(|existing| *existing != class)
            .map(String::from)
            .collect();
        self.set_attribute(node, "class", &list.join(" "));
    }

    /// Replace the node's class attribute with the given space-separated list.
    pub fn set_class_name(&mut self, node: NodeId, class_name: &str) {
        self.set_attribute(node, "class", class_name);
    }

    // Text

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        let Some(data) = self.node(node) else {
            return String::new();
        };
        if let NodeKind::Text { text } = &data.kind {
            return text.clone();
        }
        node.descendants(&self.arena)
            .filter_map(|desc| match &self.arena.get(desc)?.get().kind {
                NodeKind::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace all children of `node` with a single text node.
    ///
    /// # Errors
    /// Returns an error if `node` does not belong to this document.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<()> {
        self.clear_children(node);
        if text.is_empty() {
            return Ok(());
        }
        let text_node = self.create_text(text);
        self.append_child(node, text_node)
    }

    pub fn clear_children(&mut self, node: NodeId) {
        for child in self.children(node) {
            child.detach(&mut self.arena);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn sample() -> Result<(Document, NodeId, NodeId)> {
        let mut doc = Document::new();
        let root = doc.root();
        let body = doc.append_element(root, "body")?;
        let div = doc.append_element(body, "DIV")?;
        doc.set_attribute(div, "id", "box");
        Ok((doc, body, div))
    }

    #[test]
    fn removed_nodes_report_detached() -> Result<()> {
        let (mut doc, body, div) = sample()?;
        assert!(doc.is_attached(div));
        doc.remove(div);
        assert!(!doc.is_attached(div));
        assert!(doc.is_attached(body));
        assert_eq!(doc.get_element_by_id("box"), None);
        // The id remains usable after detaching.
        assert_eq!(doc.tag(div), Some("div"));
        Ok(())
    }

    #[test]
    fn freed_nodes_leave_the_arena() -> Result<()> {
        let (mut doc, body, div) = sample()?;
        let text = doc.create_text("hola");
        doc.append_child(div, text)?;
        let before = doc.live_nodes();

        doc.free(div);
        assert_eq!(doc.live_nodes(), before - 2);
        assert!(!doc.is_attached(div));
        assert_eq!(doc.tag(div), None);
        assert!(doc.children(body).is_empty());

        // a reused slot does not revive the stale id
        let span = doc.append_element(body, "span")?;
        assert_eq!(doc.tag(div), None);
        assert_eq!(doc.tag(span), Some("span"));

        doc.free(div);
        doc.free(doc.root());
        assert!(doc.is_attached(body));
        Ok(())
    }

    #[test]
    fn class_list_ops_are_idempotent() -> Result<()> {
        let (mut doc, _, div) = sample()?;
        doc.add_class(div, "is-valid");
        doc.add_class(div, "is-valid");
        assert_eq!(doc.classes(div), vec!["is-valid"]);
        doc.add_class(div, "form-control");
        doc.remove_class(div, "is-valid");
        doc.remove_class(div, "is-valid");
        assert_eq!(doc.attribute(div, "class"), Some("form-control"));
        Ok(())
    }

    #[test]
    fn set_text_content_replaces_children() -> Result<()> {
        let (mut doc, _, div) = sample()?;
        let span = doc.append_element(div, "span")?;
        doc.set_text_content(span, "inner")?;
        assert_eq!(doc.text_content(div), "inner");
        doc.set_text_content(div, "flat")?;
        assert_eq!(doc.text_content(div), "flat");
        assert!(!doc.is_attached(span));
        Ok(())
    }

    #[test]
    fn append_rejects_cycles() -> Result<()> {
        let (mut doc, body, div) = sample()?;
        assert!(doc.append_child(div, body).is_err());
        Ok(())
    }
}
