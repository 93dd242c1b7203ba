//! Document - High-level document API

use std::collections::HashMap;

use crate::{DOMRect, DomTree, ElementData, NodeData, NodeId, SelectorList};

/// Document loading state (`document.readyState`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    #[default]
    Loading,
    Interactive,
    Complete,
}

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    ready_state: ReadyState,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Element boxes in page coordinates
    layout: HashMap<NodeId, DOMRect>,
}

impl Document {
    /// Create a document with an html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            ready_state: ReadyState::Loading,
            html_element: html,
            head_element: head,
            body_element: body,
            layout: HashMap::new(),
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            ready_state: ReadyState::Loading,
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            layout: HashMap::new(),
        }
    }

    /// Locate html/head/body after the tree was built externally
    pub fn finalize(&mut self) {
        let find = |tree: &DomTree, parent: NodeId, tag: &str| {
            tree.children(parent)
                .find(|&c| tree.element(c).is_some_and(|e| e.tag == tag))
                .unwrap_or(NodeId::NONE)
        };

        self.html_element = find(&self.tree, self.tree.root(), "html");
        if self.html_element.is_valid() {
            self.head_element = find(&self.tree, self.html_element, "head");
            self.body_element = find(&self.tree, self.html_element, "body");
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    /// Get document title
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }
        self.tree
            .children(self.head_element)
            .find(|&c| self.tree.element(c).is_some_and(|e| e.tag == "title"))
            .map(|title| self.tree.text_content(title).trim().to_string())
            .unwrap_or_default()
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Element data of a node
    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        self.tree.element(node)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Get a connected element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|&n| self.tree.element(n).is_some_and(|e| e.id() == Some(id)))
    }

    /// First element matching a selector, in document order
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.query_selector_within(self.tree.root(), selector)
            .into_iter()
            .next()
    }

    /// All elements matching a selector, in document order
    pub fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        self.query_selector_within(self.tree.root(), selector)
    }

    /// Elements under `scope` matching a selector
    ///
    /// An invalid selector matches nothing and logs a warning.
    pub fn query_selector_within(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        match SelectorList::parse(selector) {
            Ok(list) => self.select(scope, &list),
            Err(err) => {
                tracing::warn!("Invalid selector `{}`: {}", selector, err);
                Vec::new()
            }
        }
    }

    /// Elements under `scope` matching a parsed selector list
    pub fn select(&self, scope: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
        self.tree
            .descendants(scope)
            .filter(|&n| selectors.matches(&self.tree, n))
            .collect()
    }

    /// Closest inclusive ancestor that is an element with the given tag
    pub fn closest_tag(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        std::iter::once(node)
            .chain(self.tree.ancestors(node))
            .find(|&n| self.tree.element(n).is_some_and(|e| e.tag == tag))
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.tree.append_child(parent, child);
    }

    /// Detach a node from the document (`node.remove()`)
    ///
    /// The subtree keeps its arena slots and can be re-attached.
    pub fn remove(&mut self, node: NodeId) {
        self.tree.detach(node);
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.tree.is_connected(node)
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.tree.text_content(node)
    }

    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        self.tree.set_text_content(node, text);
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|e| e.get_attr(name))
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.tree.element_mut(node) {
            el.set_attr(name, value);
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.tree.element_mut(node) {
            el.add_class(class);
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.tree.element_mut(node) {
            el.remove_class(class);
        }
    }

    /// Toggle a class, returning whether it is now present
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        let present = self.has_class(node, class);
        if present {
            self.remove_class(node, class);
        } else {
            self.add_class(node, class);
        }
        !present && self.element(node).is_some()
    }

    /// Add or remove a class depending on `on`
    pub fn set_class(&mut self, node: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    /// Inline style property value
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node).and_then(|e| e.style().get(property))
    }

    /// Set an inline style property; an empty value removes it
    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(el) = self.tree.element_mut(node) {
            el.set_style(property, value);
        }
    }

    /// Set several inline style properties in order
    pub fn set_styles(&mut self, node: NodeId, declarations: &[(&str, &str)]) {
        if let Some(el) = self.tree.element_mut(node) {
            for (property, value) in declarations {
                el.set_style(property, value);
            }
        }
    }

    pub fn remove_style(&mut self, node: NodeId, property: &str) {
        if let Some(el) = self.tree.element_mut(node) {
            el.remove_style(property);
        }
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Assign an element box in page coordinates
    pub fn set_layout(&mut self, node: NodeId, rect: DOMRect) {
        self.layout.insert(node, rect);
    }

    /// Element box in page coordinates, if laid out
    pub fn layout(&self, node: NodeId) -> Option<DOMRect> {
        self.layout.get(&node).copied()
    }

    /// Distance from the page top (0 when not laid out)
    pub fn offset_top(&self, node: NodeId) -> f64 {
        self.layout(node).map_or(0.0, |r| r.y)
    }

    /// Box height (0 when not laid out)
    pub fn offset_height(&self, node: NodeId) -> f64 {
        self.layout(node).map_or(0.0, |r| r.height)
    }

    /// Lowest box bottom among connected elements
    pub fn scroll_height(&self) -> f64 {
        self.layout
            .iter()
            .filter(|(node, _)| self.tree.is_connected(**node))
            .map(|(_, rect)| rect.bottom())
            .fold(0.0, f64::max)
    }

    /// Count of element nodes connected to the document
    pub fn element_count(&self) -> usize {
        self.tree
            .descendants(self.tree.root())
            .filter(|&n| matches!(self.tree.get(n).map(|n| &n.data), Some(NodeData::Element(_))))
            .count()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new("https://example.com/");
        let body = doc.body();
        let header = doc.create_element("header");
        doc.set_attribute(header, "class", "header");
        let section = doc.create_element("section");
        doc.set_attribute(section, "id", "services");
        doc.append_child(body, header);
        doc.append_child(body, section);
        (doc, header, section)
    }

    #[test]
    fn test_skeleton() {
        let doc = Document::default();
        assert!(doc.document_element().is_valid());
        assert!(doc.head().is_valid());
        assert!(doc.body().is_valid());
        assert_eq!(doc.ready_state(), ReadyState::Loading);
    }

    #[test]
    fn test_queries() {
        let (doc, header, section) = page();
        assert_eq!(doc.query_selector(".header"), Some(header));
        assert_eq!(doc.get_element_by_id("services"), Some(section));
        assert_eq!(doc.query_selector_all("section[id], .header"), vec![header, section]);
        assert!(doc.query_selector_all("div:hover").is_empty());
    }

    #[test]
    fn test_removed_nodes_are_not_found() {
        let (mut doc, header, _) = page();
        doc.remove(header);
        assert_eq!(doc.query_selector(".header"), None);
        assert!(!doc.is_connected(header));
    }

    #[test]
    fn test_toggle_class() {
        let (mut doc, header, _) = page();
        assert!(doc.toggle_class(header, "active"));
        assert!(doc.has_class(header, "active"));
        assert!(!doc.toggle_class(header, "active"));
        assert!(!doc.has_class(header, "active"));
    }

    #[test]
    fn test_layout_and_scroll_height() {
        let (mut doc, header, section) = page();
        doc.set_layout(header, DOMRect::from_xywh(0.0, 0.0, 1024.0, 80.0));
        doc.set_layout(section, DOMRect::from_xywh(0.0, 80.0, 1024.0, 900.0));

        assert_eq!(doc.offset_top(section), 80.0);
        assert_eq!(doc.offset_height(header), 80.0);
        assert_eq!(doc.scroll_height(), 980.0);

        doc.remove(section);
        assert_eq!(doc.scroll_height(), 80.0);
    }

    #[test]
    fn test_title() {
        let mut doc = Document::default();
        let title = doc.create_element("title");
        doc.set_text_content(title, " Lumen ");
        let head = doc.head();
        doc.append_child(head, title);
        assert_eq!(doc.title(), "Lumen");
    }
}
