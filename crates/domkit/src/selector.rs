//! Selector argument normalization
//!
//! Every accepted shape is turned into one ordered, duplicate-free list of
//! element handles before any element is touched.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use domkit_dom::{NodeId, NodeList};

use crate::{FitError, FitHost};

/// Wrapped collection from another library that can list its elements
pub trait ElementCollection {
    fn to_array(&self) -> Vec<NodeId>;
}

/// The elements a utility should act on
pub enum Selector {
    /// Nothing was passed
    None,
    /// CSS selector, matched in document order
    Query(String),
    /// Result of an earlier query
    NodeList(NodeList),
    /// Plain ordered collection
    Elements(Vec<NodeId>),
    /// Set-like collection, processed in document order
    Set(BTreeSet<NodeId>),
    /// Third-party wrapper exposing `to_array`
    Wrapped(Box<dyn ElementCollection>),
    /// Single element handle
    Element(NodeId),
}

impl Selector {
    pub fn wrapped(collection: impl ElementCollection + 'static) -> Self {
        Self::Wrapped(Box::new(collection))
    }

    /// Short name of the shape, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Query(_) => "query",
            Self::NodeList(_) => "node list",
            Self::Elements(_) => "element list",
            Self::Set(_) => "element set",
            Self::Wrapped(_) => "wrapped collection",
            Self::Element(_) => "element",
        }
    }

    /// Resolve to element handles in processing order
    pub fn resolve<H: FitHost + ?Sized>(&self, host: &H) -> Result<Vec<NodeId>, FitError> {
        let nodes = match self {
            Self::None => return Err(FitError::InvalidSelector("no selector given".into())),
            Self::Query(query) => host.query_selector_all(query)
                .map_err(|e| FitError::InvalidSelector(format!("`{query}`: {e}")))?,
            Self::NodeList(list) => list.to_vec(),
            Self::Elements(nodes) => nodes.clone(),
            Self::Set(set) => {
                let mut nodes: Vec<NodeId> = set.iter().copied().collect();
                nodes.sort_by_cached_key(|&n| host.document_position(n).unwrap_or(usize::MAX));
                nodes
            }
            Self::Wrapped(collection) => collection.to_array(),
            Self::Element(node) => {
                if !host.is_element(*node) {
                    return Err(FitError::InvalidSelector(format!("node {node} is not an element")));
                }
                vec![*node]
            }
        };
        Ok(elements_only(host, nodes))
    }
}

/// Drop non-element handles and repeats, keeping first occurrences
fn elements_only<H: FitHost + ?Sized>(host: &H, nodes: Vec<NodeId>) -> Vec<NodeId> {
    let mut seen = HashSet::with_capacity(nodes.len());
    nodes.into_iter()
        .filter(|&n| {
            let keep = host.is_element(n);
            if !keep {
                tracing::debug!("fit_text: ignoring non-element handle {}", n);
            }
            keep
        })
        .filter(|&n| seen.insert(n))
        .collect()
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Query(q) => f.debug_tuple("Query").field(q).finish(),
            Self::NodeList(l) => f.debug_tuple("NodeList").field(l).finish(),
            Self::Elements(v) => f.debug_tuple("Elements").field(v).finish(),
            Self::Set(s) => f.debug_tuple("Set").field(s).finish(),
            Self::Wrapped(w) => f.debug_tuple("Wrapped").field(&w.to_array()).finish(),
            Self::Element(n) => f.debug_tuple("Element").field(n).finish(),
        }
    }
}

impl From<&str> for Selector {
    fn from(query: &str) -> Self {
        Self::Query(query.to_string())
    }
}

impl From<String> for Selector {
    fn from(query: String) -> Self {
        Self::Query(query)
    }
}

impl From<NodeId> for Selector {
    fn from(node: NodeId) -> Self {
        Self::Element(node)
    }
}

impl From<Vec<NodeId>> for Selector {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self::Elements(nodes)
    }
}

impl From<&[NodeId]> for Selector {
    fn from(nodes: &[NodeId]) -> Self {
        Self::Elements(nodes.to_vec())
    }
}

impl From<NodeList> for Selector {
    fn from(list: NodeList) -> Self {
        Self::NodeList(list)
    }
}

impl From<BTreeSet<NodeId>> for Selector {
    fn from(set: BTreeSet<NodeId>) -> Self {
        Self::Set(set)
    }
}

impl<T: Into<Selector>> From<Option<T>> for Selector {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domkit_dom::Document;

    struct Wrapper(Vec<NodeId>);

    impl ElementCollection for Wrapper {
        fn to_array(&self) -> Vec<NodeId> {
            self.0.clone()
        }
    }

    fn doc() -> (Document, Vec<NodeId>) {
        let mut doc = Document::default();
        let body = doc.body();
        let ids: Vec<_> = (0..3)
            .map(|_| {
                let id = doc.create_element("p");
                doc.append_child(body, id).unwrap();
                id
            })
            .collect();
        (doc, ids)
    }

    #[test]
    fn test_every_shape_resolves_in_order() {
        let (doc, ids) = doc();
        let reversed: BTreeSet<NodeId> = ids.iter().rev().copied().collect();

        let shapes: Vec<Selector> = vec![
            "p".into(),
            NodeList::from_vec(ids.clone()).into(),
            ids.clone().into(),
            reversed.into(),
            Selector::wrapped(Wrapper(ids.clone())),
        ];
        for shape in shapes {
            assert_eq!(shape.resolve(&doc).unwrap(), ids, "shape {}", shape.kind());
        }
        assert_eq!(Selector::from(ids[1]).resolve(&doc).unwrap(), vec![ids[1]]);
    }

    #[test]
    fn test_duplicates_and_non_elements_dropped() {
        let (mut doc, ids) = doc();
        let text = doc.create_text("t");
        let selector = Selector::from(vec![ids[2], text, ids[0], ids[2]]);

        assert_eq!(selector.resolve(&doc).unwrap(), vec![ids[2], ids[0]]);
    }

    #[test]
    fn test_invalid_shapes() {
        let (mut doc, _) = doc();
        let text = doc.create_text("t");

        assert!(matches!(Selector::from(None::<NodeId>).resolve(&doc), Err(FitError::InvalidSelector(_))));
        assert!(matches!(Selector::from(text).resolve(&doc), Err(FitError::InvalidSelector(_))));
        assert!(matches!(Selector::from("p span").resolve(&doc), Err(FitError::InvalidSelector(_))));
    }

    #[test]
    fn test_query_without_matches_is_valid() {
        let (doc, _) = doc();
        assert_eq!(Selector::from(".nothing").resolve(&doc).unwrap(), Vec::<NodeId>::new());
    }
}
