//! In-page anchor scrolling and active nav link tracking

use std::cell::RefCell;
use std::rc::Rc;

use lumen_dom::{Document, NodeId};
use lumen_window::{EventKind, EventTarget, ScrollToOptions, Window};

use crate::config::AnchorsConfig;
use crate::rate_limit::throttle;
use crate::Elements;

/// Id of the section whose activation range holds `scroll_y`
///
/// A section is active over `[top - header_height - activation_offset,
/// bottom)`. When ranges overlap the last section in document order wins.
pub fn active_section(
    document: &Document,
    scroll_y: f64,
    header_height: f64,
    activation_offset: f64,
) -> Option<String> {
    let mut current = None;
    for section in document.query_selector_all("section[id]") {
        let top = document.offset_top(section) - header_height - activation_offset;
        let bottom = document.offset_top(section) + document.offset_height(section);
        if scroll_y >= top && scroll_y < bottom {
            current = document.element(section).and_then(|e| e.id()).map(str::to_string);
        }
    }
    current
}

/// Anchor click interception and nav highlighting
#[derive(Clone)]
pub struct SmoothScroll {
    anchors: Vec<NodeId>,
    active: Rc<RefCell<Option<String>>>,
}

impl SmoothScroll {
    pub fn install(window: &mut Window, elements: &Elements, config: &AnchorsConfig) -> Self {
        let elements = *elements;
        let anchors = window.document().query_selector_all("a[href^=\"#\"]");

        for &anchor in &anchors {
            window.add_event_listener(EventTarget::Node(anchor), EventKind::Click, move |w, event| {
                event.prevent_default();
                let Some(fragment) = w
                    .document()
                    .get_attribute(anchor, "href")
                    .and_then(|href| href.strip_prefix('#'))
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                else {
                    return;
                };
                let Some(target) = w.document().get_element_by_id(&fragment) else {
                    tracing::debug!("Anchor target #{} not found", fragment);
                    return;
                };
                let top = w.document().offset_top(target) - elements.header_height(w.document());
                w.scroll_to(ScrollToOptions::smooth(top.max(0.0)));
            });
        }

        let active = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&active);
        let config = config.clone();
        let throttle_ms = config.throttle_ms;
        let on_scroll = throttle(throttle_ms, move |w: &mut Window, ()| {
            let header_height = elements.header_height(w.document());
            let current = active_section(
                w.document(),
                w.scroll_y(),
                header_height,
                config.activation_offset,
            );
            highlight(w.document_mut(), current.as_deref(), &config.active_class);
            *slot.borrow_mut() = current;
        });
        window.add_event_listener(EventTarget::Window, EventKind::Scroll, move |w, _| {
            on_scroll(w, ())
        });

        tracing::debug!("Smooth scroll wired on {} anchors", anchors.len());
        Self { anchors, active }
    }

    /// Intercepted in-page anchors
    pub fn anchors(&self) -> &[NodeId] {
        &self.anchors
    }

    /// Section id highlighted by the last handled scroll
    pub fn active(&self) -> Option<String> {
        self.active.borrow().clone()
    }
}

fn highlight(document: &mut Document, section: Option<&str>, class: &str) {
    for link in document.query_selector_all(".nav-link") {
        let on = section.is_some_and(|id| {
            document
                .get_attribute(link, "href")
                .and_then(|href| href.strip_prefix('#'))
                == Some(id)
        });
        document.set_class(link, class, on);
    }
}
