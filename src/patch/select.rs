//! Predicates for selecting patch nodes.

use crate::parser::Chunk;
use crate::types::Node;

/// A condition a node must meet to be selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Chunk(Chunk),
    Element(String),
    /// Matches `Node::name()`, e.g. the object type of an `obj` line.
    Name(String),
    /// Matches `Node::get(key)`; `None` selects nodes without the value.
    Attr(String, Option<String>),
    Vanilla(bool),
    Known(bool),
}

impl Predicate {
    pub fn element(name: impl Into<String>) -> Self {
        Predicate::Element(name.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        Predicate::Name(name.into())
    }

    pub fn attr(key: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::Attr(key.into(), Some(value.into()))
    }

    pub fn matches(&self, node: &Node) -> bool {
        match self {
            Predicate::Chunk(chunk) => node.chunk() == *chunk,
            Predicate::Element(element) => node.element() == element,
            Predicate::Name(name) => node.name() == *name,
            Predicate::Attr(key, value) => node.get(key) == value.as_deref(),
            Predicate::Vanilla(vanilla) => node.vanilla() == *vanilla,
            Predicate::Known(known) => node.known() == *known,
        }
    }
}

/// True when every predicate matches.
pub fn matches_all(node: &Node, predicates: &[Predicate]) -> bool {
    predicates.iter().all(|p| p.matches(node))
}
