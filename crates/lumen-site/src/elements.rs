//! Element cache
//!
//! The named nodes controllers share, looked up once at setup and passed
//! by reference from then on.

use lumen_dom::{Document, NodeId};

/// Resolved page elements; `None` when the markup lacks one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Elements {
    pub header: Option<NodeId>,
    pub nav_menu: Option<NodeId>,
    pub hamburger: Option<NodeId>,
    pub progress_bar: Option<NodeId>,
    pub cta_button: Option<NodeId>,
    pub scroll_to_top: Option<NodeId>,
    pub hero_title: Option<NodeId>,
    pub services_hero: Option<NodeId>,
    pub services_title: Option<NodeId>,
}

impl Elements {
    /// Look up every named element. Safe to call again; all keys are
    /// resolved afresh.
    pub fn resolve(document: &Document) -> Self {
        let elements = Self {
            header: document.query_selector(".header"),
            nav_menu: document.query_selector(".nav-menu"),
            hamburger: document.query_selector(".hamburger"),
            progress_bar: document.query_selector(".progress-bar"),
            cta_button: document.query_selector(".cta-button"),
            scroll_to_top: document.get_element_by_id("scrollToTop"),
            hero_title: document.query_selector(".hero-title"),
            services_hero: document.query_selector(".services-hero"),
            services_title: document.query_selector(".services-hero h1"),
        };
        tracing::debug!("Resolved {} of 9 page elements", elements.found());
        elements
    }

    /// Number of elements present
    pub fn found(&self) -> usize {
        [
            self.header,
            self.nav_menu,
            self.hamburger,
            self.progress_bar,
            self.cta_button,
            self.scroll_to_top,
            self.hero_title,
            self.services_hero,
            self.services_title,
        ]
        .iter()
        .flatten()
        .count()
    }

    /// Current header height, 0 without a header
    pub fn header_height(&self, document: &Document) -> f64 {
        self.header.map_or(0.0, |h| document.offset_height(h))
    }
}

#[cfg(test)]
mod tests {
    use lumen_dom::DOMRect;

    use super::*;

    #[test]
    fn test_resolve_partial_markup() {
        let mut doc = Document::default();
        let body = doc.body();
        let header = doc.create_element("header");
        doc.set_attribute(header, "class", "header");
        let hero = doc.create_element("section");
        doc.set_attribute(hero, "class", "services-hero");
        let title = doc.create_element("h1");
        doc.append_child(body, header);
        doc.append_child(body, hero);
        doc.append_child(hero, title);
        doc.set_layout(header, DOMRect::from_xywh(0.0, 0.0, 1000.0, 72.0));

        let elements = Elements::resolve(&doc);
        assert_eq!(elements.header, Some(header));
        assert_eq!(elements.services_title, Some(title));
        assert_eq!(elements.hamburger, None);
        assert_eq!(elements.found(), 3);
        assert_eq!(elements.header_height(&doc), 72.0);
        assert_eq!(Elements::default().header_height(&doc), 0.0);
    }
}
