//! Selector matching
//!
//! Compound selectors and comma lists: `tag`, `*`, `#id`, `.class`,
//! `[attr]`, `[attr=value]` and `:checked`. Combinators are not supported.

use crate::{ElementData, NodeId, SelectorError};

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    Attribute { name: String, value: Option<String> },
    Checked,
}

impl SimpleSelector {
    pub fn matches(&self, el: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => el.tag.eq_ignore_ascii_case(tag),
            Self::Id(id) => el.id() == Some(id.as_str()),
            Self::Class(class) => el.has_class(class),
            Self::Attribute { name, value } => match (el.get_attr(name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            },
            Self::Checked => el.input.as_ref()
                .is_some_and(|i| i.input_type.is_checkable() && i.checked),
        }
    }
}

/// All simple selectors must match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector(pub Vec<SimpleSelector>);

impl CompoundSelector {
    pub fn matches(&self, el: &ElementData) -> bool {
        self.0.iter().all(|s| s.matches(el))
    }
}

/// Comma-separated selector list; any compound may match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(pub Vec<CompoundSelector>);

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        if input.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut parser = Parser { src: input, pos: 0 };
        let mut list = Vec::new();
        loop {
            parser.skip_ws();
            list.push(parser.compound()?);
            parser.skip_ws();
            match parser.peek() {
                None => break,
                Some(',') => parser.bump(),
                Some(_) => return Err(parser.unsupported()),
            }
        }
        Ok(Self(list))
    }

    pub fn matches(&self, el: &ElementData) -> bool {
        self.0.iter().any(|c| c.matches(el))
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn unsupported(&self) -> SelectorError {
        SelectorError::Unsupported(self.src[self.pos..].to_string())
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_') {
            self.bump();
        }
        if self.pos == start {
            return Err(self.unsupported());
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut parts = Vec::new();
        match self.peek() {
            Some('*') => {
                self.bump();
                parts.push(SimpleSelector::Universal);
            }
            Some(c) if c.is_alphabetic() => {
                parts.push(SimpleSelector::Tag(self.ident()?.to_ascii_lowercase()));
            }
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    parts.push(SimpleSelector::Id(self.ident()?));
                }
                Some('.') => {
                    self.bump();
                    parts.push(SimpleSelector::Class(self.ident()?));
                }
                Some('[') => {
                    self.bump();
                    parts.push(self.attribute()?);
                }
                Some(':') => {
                    self.bump();
                    let pseudo = self.ident()?;
                    if !pseudo.eq_ignore_ascii_case("checked") {
                        return Err(SelectorError::Unsupported(format!(":{pseudo}")));
                    }
                    parts.push(SimpleSelector::Checked);
                }
                _ => break,
            }
        }
        if parts.is_empty() {
            return Err(self.unsupported());
        }
        Ok(CompoundSelector(parts))
    }

    fn attribute(&mut self) -> Result<SimpleSelector, SelectorError> {
        self.skip_ws();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_ws();
        let value = match self.peek() {
            Some(']') => None,
            Some('=') => {
                self.bump();
                self.skip_ws();
                let value = match self.peek() {
                    Some(quote @ ('"' | '\'')) => {
                        self.bump();
                        let start = self.pos;
                        let len = self.src[start..].find(quote).ok_or_else(|| self.unsupported())?;
                        self.pos = start + len + quote.len_utf8();
                        self.src[start..start + len].to_string()
                    }
                    _ => self.ident()?,
                };
                self.skip_ws();
                Some(value)
            }
            _ => return Err(self.unsupported()),
        };
        if self.peek() != Some(']') {
            return Err(self.unsupported());
        }
        self.bump();
        Ok(SimpleSelector::Attribute { name, value })
    }
}

/// Static node list, as returned by querySelectorAll
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeList {
    nodes: Vec<NodeId>,
}

impl NodeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(nodes: Vec<NodeId>) -> Self {
        Self { nodes }
    }

    pub fn length(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter()
    }

    pub fn to_vec(&self) -> Vec<NodeId> {
        self.nodes.clone()
    }
}

impl IntoIterator for NodeList {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}
