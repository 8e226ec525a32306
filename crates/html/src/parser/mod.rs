//! HTML5 parsing using html5ever.
//!
//! Markup is parsed into an `RcDom` first and then copied into the arena-backed
//! [`Document`]. Whitespace-only text runs, comments, doctypes and processing
//! instructions are dropped on the way.

use std::rc::Rc;

use crate::dom::Document;
use anyhow::{Result, anyhow};
use html5ever::tendril::TendrilSink as _;
use html5ever::{ParseOpts, parse_document as parse_html};
use indextree::NodeId;
use log::debug;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse a complete HTML document.
///
/// # Errors
/// Returns an error if the parsed tree cannot be copied into the arena.
pub fn parse_document(html: &str) -> Result<Document> {
    let rc_dom = parse_html(RcDom::default(), ParseOpts::default()).one(html);
    let mut doc = Document::new();
    let root = doc.root();
    convert_children(&mut doc, &rc_dom.document, root)?;
    debug!("parsed document with {} elements", doc.descendant_elements(root).len());
    Ok(doc)
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if let NodeData::Element { name, .. } = &handle.data {
        if &*name.local == tag {
            return Some(Rc::clone(handle));
        }
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

fn convert_children(doc: &mut Document, rc_node: &Handle, parent: NodeId) -> Result<()> {
    for child in rc_node.children.borrow().iter() {
        convert_node(doc, child, parent)?;
    }
    Ok(())
}

fn convert_node(doc: &mut Document, rc_node: &Handle, parent: NodeId) -> Result<()> {
    match &rc_node.data {
        NodeData::Document => convert_children(doc, rc_node, parent),
        NodeData::Text { contents } => {
            let text = contents.borrow().to_string();
            if text.trim().is_empty() {
                return Ok(());
            }
            let node = doc.create_text(&text);
            doc.append_child(parent, node)
        }
        NodeData::Element { name, attrs, .. } => {
            let node = doc.create_element(&name.local);
            for attr in attrs.borrow().iter() {
                doc.set_attribute(node, &attr.name.local, &attr.value);
            }
            doc.append_child(parent, node)?;
            convert_children(doc, rc_node, node)
        }
        NodeData::Doctype { .. }
        | NodeData::Comment { .. }
        | NodeData::ProcessingInstruction { .. } => Ok(()),
    }
}

impl Document {
    /// Replace the children of `node` with the nodes parsed from `html`, which
    /// is interpreted as body content.
    ///
    /// # Errors
    /// Returns an error if `node` does not belong to this document.
    pub fn set_inner_html(&mut self, node: NodeId, html: &str) -> Result<()> {
        let rc_dom = parse_html(RcDom::default(), ParseOpts::default()).one(html);
        let body = find_element(&rc_dom.document, "body")
            .ok_or_else(|| anyhow!("parsed fragment has no body"))?;
        self.clear_children(node);
        convert_children(self, &body, node)
    }
}
