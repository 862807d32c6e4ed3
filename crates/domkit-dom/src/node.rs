//! DOM Node
//!
//! Nodes link to each other through `NodeId`s into the arena rather than
//! pointers, so the tree can be mutated freely while handles stay valid.

use crate::{NodeId, InlineStyle, ElementGeometry, InputState, InputType};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if root or detached)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self::with_data(NodeData::Text(content))
    }

    /// Create a comment node
    pub fn comment(content: String) -> Self {
        Self::with_data(NodeData::Comment(content))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Lowercased tag name
    pub tag: String,
    /// Attributes in insertion order
    pub attrs: Vec<Attribute>,
    /// Inline `style` declarations
    pub style: InlineStyle,
    /// Box geometry as last laid out
    pub geometry: ElementGeometry,
    /// Form control state (`input` and `textarea` only)
    pub input: Option<InputState>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        let input = match tag.as_str() {
            "input" | "textarea" => Some(InputState::default()),
            _ => None,
        };
        Self {
            tag,
            attrs: Vec::new(),
            style: InlineStyle::new(),
            geometry: ElementGeometry::default(),
            input,
        }
    }

    /// Get an attribute value (names are case-insensitive)
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, keeping reflected state in sync
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        self.reflect_attr(&name, value);
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value.to_string(),
            None => self.attrs.push(Attribute { name, value: value.to_string() }),
        }
    }

    /// Remove an attribute, returning its old value. Reflected state goes
    /// back to what it is without the attribute.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|a| a.name.eq_ignore_ascii_case(name))?;
        let attr = self.attrs.remove(pos);
        match attr.name.as_str() {
            "style" => self.style = InlineStyle::new(),
            name => {
                if let Some(input) = self.input.as_mut() {
                    input.unreflect_attr(name);
                }
            }
        }
        Some(attr.value)
    }

    /// Set one inline style declaration and rewrite the `style` attribute
    /// to match. An empty value removes the declaration.
    pub fn set_style_property(&mut self, property: &str, value: &str) {
        self.style.set(property, value);
        let css_text = self.style.css_text();
        let pos = self.attrs.iter().position(|a| a.name == "style");
        match (pos, css_text.is_empty()) {
            (Some(pos), true) => {
                self.attrs.remove(pos);
            }
            (Some(pos), false) => self.attrs[pos].value = css_text,
            (None, true) => {}
            (None, false) => self.attrs.push(Attribute { name: "style".to_string(), value: css_text }),
        }
    }

    /// `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    /// Check the `class` attribute for a class token
    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
    }

    /// `name` attribute
    pub fn name(&self) -> Option<&str> {
        self.get_attr("name")
    }

    fn reflect_attr(&mut self, name: &str, value: &str) {
        match name {
            "style" => self.style = InlineStyle::parse(value),
            _ => {
                if let Some(input) = self.input.as_mut() {
                    input.reflect_attr(name, value);
                }
            }
        }
    }

    /// Input type, if this is a form control
    pub fn input_type(&self) -> Option<InputType> {
        self.input.as_ref().map(|i| i.input_type)
    }
}

/// Attribute
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}
