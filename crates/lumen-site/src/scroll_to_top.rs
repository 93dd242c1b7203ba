//! Floating scroll-to-top button

use std::cell::Cell;
use std::rc::Rc;

use lumen_dom::NodeId;
use lumen_window::{EventKind, EventTarget, ScrollToOptions, Window};

use crate::config::ScrollToTopConfig;
use crate::rate_limit::debounce;
use crate::Elements;

#[derive(Debug, Clone)]
pub struct ScrollToTop {
    button: NodeId,
    visible: Rc<Cell<bool>>,
}

impl ScrollToTop {
    pub fn install(
        window: &mut Window,
        elements: &Elements,
        config: &ScrollToTopConfig,
    ) -> Option<Self> {
        let Some(button) = elements.scroll_to_top else {
            tracing::debug!("Scroll-to-top inert: no button");
            return None;
        };

        let visible = Rc::new(Cell::new(false));
        let flag = Rc::clone(&visible);
        let (threshold, class) = (config.threshold, config.class.clone());
        let on_scroll = debounce(config.debounce_ms, move |w: &mut Window, ()| {
            let show = w.scroll_y() > threshold;
            w.document_mut().set_class(button, &class, show);
            flag.set(show);
        });
        window.add_event_listener(EventTarget::Window, EventKind::Scroll, move |w, _| {
            on_scroll(w, ())
        });

        window.add_event_listener(EventTarget::Node(button), EventKind::Click, |w, _| {
            w.scroll_to(ScrollToOptions::smooth(0.0));
        });

        Some(Self { button, visible })
    }

    pub fn button(&self) -> NodeId {
        self.button
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }
}
