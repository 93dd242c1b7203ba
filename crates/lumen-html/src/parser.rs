//! HTML5 Parser implementation
//!
//! Parses into html5ever's RcDom, then copies the result into the arena.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use lumen_dom::{Document, DomTree, NodeId};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::HtmlError;

/// HTML5 parser
#[derive(Debug, Clone, Copy)]
pub struct HtmlParser {
    keep_comments: bool,
}

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self {
            keep_comments: false,
        }
    }

    /// Keep comment nodes in the resulting tree
    pub fn with_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    ///
    /// The returned document is still `Loading`; whoever hosts it decides
    /// when parsing counts as finished.
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, HtmlError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .map_err(|source| HtmlError::Io {
                url: url.to_string(),
                source,
            })?;

        let mut document = Document::empty(url);
        let root = document.tree().root();
        self.convert_node(&dom.document, document.tree_mut(), root);
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Convert an RcDom node to our DOM format
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        match &handle.data {
            NodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent);
                }
            }
            NodeData::Doctype { name, .. } => {
                let id = tree.create_doctype(name);
                tree.append_child(parent, id);
            }
            NodeData::Text { contents } => {
                let text = contents.borrow();
                if !text.trim().is_empty() {
                    let id = tree.create_text(&text);
                    tree.append_child(parent, id);
                }
            }
            NodeData::Comment { contents } => {
                if self.keep_comments {
                    let id = tree.create_comment(contents);
                    tree.append_child(parent, id);
                }
            }
            NodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                if let Some(el) = tree.element_mut(id) {
                    // set_attr keeps the id/class/style caches in step
                    for attr in attrs.borrow().iter() {
                        el.set_attr(&attr.name.local, &*attr.value);
                    }
                }
                tree.append_child(parent, id);

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id);
                }
            }
            NodeData::ProcessingInstruction { .. } => {}
        }
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}
