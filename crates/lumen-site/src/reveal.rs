//! Reveal-on-scroll

use lumen_dom::NodeId;
use lumen_window::{IntersectionObserverOptions, ObserverId, RootMargin, Window};

use crate::config::RevealConfig;

/// One-way entrance animation over the configured content selectors
#[derive(Debug, Clone)]
pub struct Reveal {
    observer: ObserverId,
    targets: Vec<NodeId>,
}

impl Reveal {
    /// Observe every element matching the content selectors
    ///
    /// The set is fixed here; elements added later are never observed.
    pub fn install(window: &mut Window, config: &RevealConfig) -> Option<Self> {
        let mut targets: Vec<NodeId> = Vec::new();
        for selector in &config.selectors {
            for node in window.document().query_selector_all(selector) {
                if !targets.contains(&node) {
                    targets.push(node);
                }
            }
        }
        if targets.is_empty() {
            tracing::debug!("Reveal inert: no content elements");
            return None;
        }

        let root_margin = config.root_margin.parse::<RootMargin>().unwrap_or_else(|e| {
            tracing::warn!("Ignoring reveal root margin: {e}");
            RootMargin::default()
        });
        let options = IntersectionObserverOptions::default()
            .with_threshold(config.threshold)
            .with_root_margin(root_margin);

        let threshold = config.threshold;
        let class = config.class.clone();
        let observer = window.create_intersection_observer(options, move |w, entries| {
            for entry in entries {
                if entry.is_intersecting && entry.intersection_ratio >= threshold {
                    w.document_mut().add_class(entry.target, &class);
                }
            }
        });
        for &target in &targets {
            window.observe(observer, target);
        }

        tracing::debug!("Reveal observing {} elements", targets.len());
        Some(Self { observer, targets })
    }

    pub fn observer(&self) -> ObserverId {
        self.observer
    }

    /// Observed elements in selector order
    pub fn targets(&self) -> &[NodeId] {
        &self.targets
    }
}

#[cfg(test)]
mod tests {
    use lumen_dom::{DOMRect, Document};
    use lumen_window::Viewport;

    use super::*;

    #[test]
    fn test_reveal_is_one_way() {
        let mut doc = Document::default();
        let body = doc.body();
        let card = doc.create_element("div");
        doc.set_attribute(card, "class", "service-card");
        let filler = doc.create_element("div");
        doc.append_child(body, card);
        doc.append_child(body, filler);
        doc.set_layout(card, DOMRect::from_xywh(0.0, 1000.0, 400.0, 200.0));
        doc.set_layout(filler, DOMRect::from_xywh(0.0, 0.0, 400.0, 3000.0));

        let mut window = Window::new(doc, Viewport::new(800.0, 600.0));
        let reveal = Reveal::install(&mut window, &RevealConfig::default()).unwrap();
        assert_eq!(reveal.targets(), &[card]);

        window.advance(16);
        assert!(!window.document().has_class(card, "revealed"));

        // 20px of the card inside the margin-shrunk root: ratio 0.1
        window.user_scroll_to(470.0);
        window.advance(16);
        assert!(window.document().has_class(card, "revealed"));

        window.user_scroll_to(0.0);
        window.advance(16);
        assert!(window.document().has_class(card, "revealed"));
    }

    #[test]
    fn test_inert_without_targets() {
        let mut window = Window::new(Document::default(), Viewport::default());
        assert!(Reveal::install(&mut window, &RevealConfig::default()).is_none());
    }
}
