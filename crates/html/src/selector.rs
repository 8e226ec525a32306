//! A small CSS selector engine covering what page scripts query with:
//! type, `#id`, `.class`, `*`, attribute presence / `=` / `^=` / `$=` / `*=` /
//! `~=` conditions, descendant and child combinators, and comma-separated lists.

use crate::dom::Document;
use anyhow::{Result, bail};
use indextree::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
    /// One of the whitespace-separated words equals the value.
    Includes(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrCondition {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// One complex selector: compounds joined left to right by combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
    combinators: Vec<Combinator>,
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}

struct Cursor<'src> {
    chars: Vec<char>,
    pos: usize,
    source: &'src str,
}

impl<'src> Cursor<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            source,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn ident(&mut self) -> Result<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            bail!("expected identifier at {} in {:?}", self.pos, self.source);
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn attr_value(&mut self) -> Result<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let mut value = String::new();
                loop {
                    match self.bump() {
                        Some(ch) if ch == quote => return Ok(value),
                        Some(ch) => value.push(ch),
                        None => bail!("unterminated string in {:?}", self.source),
                    }
                }
            }
            _ => self.ident(),
        }
    }

    fn attr_condition(&mut self) -> Result<AttrCondition> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();
        let op = match self.bump() {
            Some(']') => return Ok(AttrCondition { name, op: AttrOp::Exists }),
            Some('=') => AttrOp::Equals(self.attr_value()?),
            Some('^') if self.bump() == Some('=') => AttrOp::Prefix(self.attr_value()?),
            Some('$') if self.bump() == Some('=') => AttrOp::Suffix(self.attr_value()?),
            Some('*') if self.bump() == Some('=') => AttrOp::Contains(self.attr_value()?),
            Some('~') if self.bump() == Some('=') => AttrOp::Includes(self.attr_value()?),
            other => bail!("unexpected {other:?} in attribute selector {:?}", self.source),
        };
        self.skip_whitespace();
        if self.bump() != Some(']') {
            bail!("expected ']' in {:?}", self.source);
        }
        Ok(AttrCondition { name, op })
    }

    fn compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::default();
        let mut empty = true;
        loop {
            match self.peek() {
                Some('*') => {
                    self.pos += 1;
                }
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.attr_condition()?);
                }
                Some(ch) if is_ident_char(ch) && empty => {
                    compound.tag = Some(self.ident()?.to_ascii_lowercase());
                }
                _ => break,
            }
            empty = false;
        }
        if empty {
            bail!("empty compound selector at {} in {:?}", self.pos, self.source);
        }
        Ok(compound)
    }

    fn complex(&mut self) -> Result<Complex> {
        self.skip_whitespace();
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_space = self.skip_whitespace();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    combinators.push(Combinator::Child);
                }
                Some(_) if had_space => combinators.push(Combinator::Descendant),
                Some(other) => bail!("unexpected {other:?} in {:?}", self.source),
            }
            compounds.push(self.compound()?);
        }
        Ok(Complex {
            compounds,
            combinators,
        })
    }
}

impl Selector {
    /// Parse a selector list.
    ///
    /// # Errors
    /// Returns an error for syntax outside the supported subset.
    pub fn parse(source: &str) -> Result<Self> {
        let mut cursor = Cursor::new(source);
        let mut alternatives = vec![cursor.complex()?];
        while cursor.bump() == Some(',') {
            alternatives.push(cursor.complex()?);
        }
        if cursor.pos < cursor.chars.len() {
            bail!("trailing input in selector {source:?}");
        }
        Ok(Self { alternatives })
    }

    /// Whether `node` matches any alternative of the list.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.alternatives
            .iter()
            .any(|complex| complex_matches(doc, complex, complex.compounds.len() - 1, node))
    }
}

fn compound_matches(doc: &Document, compound: &Compound, node: NodeId) -> bool {
    let Some(tag) = doc.tag(node) else {
        return false;
    };
    if compound.tag.as_deref().is_some_and(|wanted| wanted != tag) {
        return false;
    }
    if let Some(id) = &compound.id {
        if doc.attribute(node, "id") != Some(id.as_str()) {
            return false;
        }
    }
    if !compound.classes.iter().all(|class| doc.has_class(node, class)) {
        return false;
    }
    compound.attrs.iter().all(|cond| {
        let Some(value) = doc.attribute(node, &cond.name) else {
            return false;
        };
        match &cond.op {
            AttrOp::Exists => true,
            AttrOp::Equals(expected) => value == expected,
            // empty operands match nothing
            AttrOp::Prefix(prefix) => !prefix.is_empty() && value.starts_with(prefix.as_str()),
            AttrOp::Suffix(suffix) => !suffix.is_empty() && value.ends_with(suffix.as_str()),
            AttrOp::Contains(needle) => !needle.is_empty() && value.contains(needle.as_str()),
            AttrOp::Includes(word) => value.split_ascii_whitespace().any(|part| part == word.as_str()),
        }
    })
}

fn complex_matches(doc: &Document, complex: &Complex, index: usize, node: NodeId) -> bool {
    if !compound_matches(doc, &complex.compounds[index], node) {
        return false;
    }
    if index == 0 {
        return true;
    }
    match complex.combinators[index - 1] {
        Combinator::Child => doc
            .parent(node)
            .is_some_and(|parent| complex_matches(doc, complex, index - 1, parent)),
        Combinator::Descendant => doc
            .ancestor_elements(node)
            .into_iter()
            .any(|ancestor| complex_matches(doc, complex, index - 1, ancestor)),
    }
}

impl Document {
    /// All descendants of `scope` matching `selector`, in document order.
    ///
    /// # Errors
    /// Returns an error if `selector` does not parse.
    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let parsed = Selector::parse(selector)?;
        Ok(self
            .descendant_elements(scope)
            .into_iter()
            .filter(|node| parsed.matches(self, *node))
            .collect())
    }

    /// First descendant of `scope` matching `selector`.
    ///
    /// # Errors
    /// Returns an error if `selector` does not parse.
    pub fn query_selector(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let parsed = Selector::parse(selector)?;
        Ok(self
            .descendant_elements(scope)
            .into_iter()
            .find(|node| parsed.matches(self, *node)))
    }

    /// Document-wide [`Document::query_selector`].
    ///
    /// # Errors
    /// Returns an error if `selector` does not parse.
    pub fn select(&self, selector: &str) -> Result<Option<NodeId>> {
        self.query_selector(self.root(), selector)
    }

    /// Document-wide [`Document::query_selector_all`].
    ///
    /// # Errors
    /// Returns an error if `selector` does not parse.
    pub fn select_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.query_selector_all(self.root(), selector)
    }

    /// Nearest inclusive ancestor of `node` matching `selector`.
    ///
    /// # Errors
    /// Returns an error if `selector` does not parse.
    pub fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let parsed = Selector::parse(selector)?;
        if parsed.matches(self, node) {
            return Ok(Some(node));
        }
        Ok(self
            .ancestor_elements(node)
            .into_iter()
            .find(|ancestor| parsed.matches(self, *ancestor)))
    }
}
