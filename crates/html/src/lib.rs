//! Headless HTML document model for the Mediconecta page runtime.
//!
//! The [`Document`] is an arena-backed tree parsed with html5ever. It exposes
//! the subset of the browser DOM the page components rely on: selector
//! queries, class lists, attributes, text content, inline styles, host-supplied
//! layout boxes, and form-control state.

#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

pub mod dom;
pub mod parser;
pub mod selector;

pub use dom::{Document, DomNode, LayoutBox, NodeKind};
pub use indextree::NodeId;
pub use parser::parse_document;
pub use selector::Selector;
