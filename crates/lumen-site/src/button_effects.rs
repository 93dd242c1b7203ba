//! Press feedback on buttons and cards

use lumen_dom::NodeId;
use lumen_window::{EventKind, EventTarget, ScrollToOptions, Window};

use crate::config::ButtonsConfig;
use crate::Elements;

/// Shrink `node` with `transform` for `duration_ms`
///
/// The inline transform in place before the press comes back afterwards;
/// without one the property is removed again.
pub fn press(window: &mut Window, node: NodeId, transform: &str, duration_ms: u64) {
    let doc = window.document_mut();
    let previous = doc.style(node, "transform").map(str::to_string);
    doc.set_style(node, "transform", transform);

    window.set_timeout(duration_ms, move |w| {
        let doc = w.document_mut();
        match &previous {
            Some(value) => doc.set_style(node, "transform", value),
            None => doc.remove_style(node, "transform"),
        }
    });
}

/// Call-to-action, contact button and contact card feedback
#[derive(Debug, Clone)]
pub struct ButtonEffects {
    wired: Vec<NodeId>,
}

impl ButtonEffects {
    pub fn install(
        window: &mut Window,
        elements: &Elements,
        config: &ButtonsConfig,
    ) -> Option<Self> {
        let mut wired = Vec::new();

        if let Some(cta) = elements.cta_button {
            let elements = *elements;
            let config = config.clone();
            window.add_event_listener(EventTarget::Node(cta), EventKind::Click, move |w, event| {
                event.prevent_default();
                if let Some(target) = w.document().query_selector(&config.cta_target) {
                    let doc = w.document();
                    let top = doc.offset_top(target) - elements.header_height(doc);
                    w.scroll_to(ScrollToOptions::smooth(top.max(0.0)));
                } else {
                    tracing::debug!("CTA target {} not found", config.cta_target);
                }
                press(w, cta, &config.button_transform, config.press_ms);
            });
            wired.push(cta);
        }

        for (selector, transform) in [
            (".contact-button", &config.button_transform),
            (".contact-card", &config.card_transform),
        ] {
            for node in window.document().query_selector_all(selector) {
                let transform = transform.clone();
                let duration = config.press_ms;
                window.add_event_listener(EventTarget::Node(node), EventKind::Click, move |w, _| {
                    press(w, node, &transform, duration);
                });
                wired.push(node);
            }
        }

        if wired.is_empty() {
            tracing::debug!("Button effects inert: nothing to press");
            return None;
        }
        Some(Self { wired })
    }

    /// Elements with press feedback
    pub fn wired(&self) -> &[NodeId] {
        &self.wired
    }
}
