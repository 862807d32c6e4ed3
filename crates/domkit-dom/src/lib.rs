//! domkit DOM - host UI tree
//!
//! Arena DOM with just enough inline styling, geometry, form state and
//! event dispatch to drive the domkit utilities.

mod node;
mod tree;
mod document;
mod selector;
mod style;
mod geometry;
mod forms;
pub mod dom_events;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::DomTree;
pub use document::Document;
pub use selector::{SimpleSelector, CompoundSelector, SelectorList, NodeList};
pub use style::{InlineStyle, CssLength, parse_leading_number, format_px, DEFAULT_FONT_SIZE_PX};
pub use geometry::ElementGeometry;
pub use forms::{InputType, InputState};
pub use dom_events::{
    DomEvent, EventType, EventPhase, EventListener, EventCallback, ListenerId,
};

use std::fmt;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this is a real node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NotFound(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Hierarchy request error")]
    HierarchyRequest,
}

/// Selector parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,

    #[error("Unsupported selector syntax at `{0}`")]
    Unsupported(String),
}

/// Failures reading style or geometry from, or writing style to, the tree
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("Computed style unavailable for {node}: {reason}")]
    ComputedStyle { node: NodeId, reason: String },

    #[error("Layout unavailable for {0}")]
    Layout(NodeId),

    #[error("Style write rejected for {node}: {reason}")]
    StyleWrite { node: NodeId, reason: String },

    #[error(transparent)]
    Dom(#[from] DomError),
}
