//! DOM Node
//!
//! Nodes link to each other through `NodeId`s rather than pointers, so the
//! whole tree lives in one `Vec` and ids stay valid after a subtree is
//! detached.

use crate::{InlineStyle, NodeId};

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
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Text(content.into()))
    }

    /// Create a comment node
    pub fn comment(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Comment(content.into()))
    }

    /// Create a doctype node
    pub fn doctype(name: impl Into<String>) -> Self {
        Self::with_data(NodeData::Doctype { name: name.into() })
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
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
    /// DOCTYPE
    Doctype { name: String },
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Element-specific data
///
/// `id`, `classes` and `style` mirror the `id`, `class` and `style`
/// attributes. They are kept in sync by [`ElementData::set_attr`] and the
/// class/style mutators, so reads never reparse attribute strings.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// Tag name, lowercase
    pub tag: String,
    attrs: Vec<Attribute>,
    id: Option<String>,
    classes: Vec<String>,
    style: InlineStyle,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Cached id attribute
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Class list in attribute order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Inline style declarations
    pub fn style(&self) -> &InlineStyle {
        &self.style
    }

    /// All attributes in insertion order
    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, refreshing the id/class/style caches
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();

        match name.as_str() {
            "id" => self.id = Some(value.clone()),
            "class" => {
                self.classes = value.split_whitespace().map(str::to_string).collect();
            }
            "style" => self.style = InlineStyle::parse(&value),
            _ => {}
        }

        self.write_attr(name, value);
    }

    /// Check the class list
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class (no-op when present)
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
            self.sync_class_attr();
        }
    }

    /// Remove a class (no-op when absent)
    pub fn remove_class(&mut self, class: &str) {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        if self.classes.len() != before {
            self.sync_class_attr();
        }
    }

    /// Set one inline style property; an empty value removes it
    pub fn set_style(&mut self, property: &str, value: &str) {
        self.style.set(property, value);
        self.sync_style_attr();
    }

    /// Remove one inline style property
    pub fn remove_style(&mut self, property: &str) {
        self.style.remove(property);
        self.sync_style_attr();
    }

    fn sync_class_attr(&mut self) {
        let joined = self.classes.join(" ");
        self.write_attr("class".to_string(), joined);
    }

    fn sync_style_attr(&mut self) {
        if self.style.is_empty() {
            self.attrs.retain(|a| a.name != "style");
        } else {
            let css = self.style.css_text();
            self.write_attr("style".to_string(), css);
        }
    }

    fn write_attr(&mut self, name: String, value: String) {
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == name) {
            attr.value = value;
            return;
        }
        self.attrs.push(Attribute { name, value });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_attribute_caches_classes() {
        let mut el = ElementData::new("DIV");
        el.set_attr("class", "nav-menu  open");

        assert_eq!(el.tag, "div");
        assert!(el.has_class("nav-menu"));
        assert!(el.has_class("open"));
        assert_eq!(el.classes().len(), 2);
    }

    #[test]
    fn test_class_mutation_updates_attribute() {
        let mut el = ElementData::new("button");
        el.add_class("hamburger");
        el.add_class("active");
        el.add_class("active");
        assert_eq!(el.get_attr("class"), Some("hamburger active"));

        el.remove_class("active");
        assert_eq!(el.get_attr("class"), Some("hamburger"));
    }

    #[test]
    fn test_style_attribute_round_trips_through_cache() {
        let mut el = ElementData::new("div");
        el.set_attr("style", "opacity: 0; transform: scale(1.1)");
        assert_eq!(el.style().get("transform"), Some("scale(1.1)"));

        el.remove_style("opacity");
        assert_eq!(el.get_attr("style"), Some("transform: scale(1.1);"));

        el.remove_style("transform");
        assert_eq!(el.get_attr("style"), None);
    }
}
