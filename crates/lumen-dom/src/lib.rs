//! Lumen DOM - Document Object Model
//!
//! Arena-backed DOM tree with the small surface page behaviors need:
//! class lists, inline styles, a CSS selector subset and element boxes.

mod document;
mod geometry;
mod node;
mod selector;
mod style;
mod tree;

pub use document::{Document, ReadyState};
pub use geometry::DOMRect;
pub use node::{Attribute, ElementData, Node, NodeData};
pub use selector::{
    AttributeMatcher, AttributeSelector, Combinator, CompoundSelector, ComplexSelector,
    SelectorComponent, SelectorError, SelectorList,
};
pub use style::InlineStyle;
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID (the document node)
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this id points somewhere
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
