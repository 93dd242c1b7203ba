//! Scroll-driven header and progress bar
//!
//! The header hides while the reader scrolls down past a threshold and
//! comes back on any upward scroll. Past a smaller threshold it switches to
//! an opaque "scrolled" skin. The progress bar tracks how far down the page
//! the reader is.

use std::cell::Cell;
use std::rc::Rc;

use lumen_dom::NodeId;
use lumen_window::{EventKind, EventTarget, Window};

use crate::config::ScrollConfig;
use crate::rate_limit::debounce;
use crate::Elements;

const HIDDEN_TRANSFORM: &str = "translateY(-100%)";
const SHOWN_TRANSFORM: &str = "translateY(0)";

const SCROLLED_BACKGROUND: &str = "rgba(255, 255, 255, 0.98)";
const SCROLLED_SHADOW: &str = "0 2px 20px rgba(0, 0, 0, 0.1)";
const RESTING_BACKGROUND: &str = "rgba(255, 255, 255, 0.95)";
const RESTING_SHADOW: &str = "none";

/// Whether the fixed header is on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderVisibility {
    #[default]
    Shown,
    Hidden,
}

/// Header background and shadow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderSkin {
    #[default]
    Resting,
    Scrolled,
}

/// Header and progress bar controller
#[derive(Clone)]
pub struct ScrollEffects {
    inner: Rc<EffectsInner>,
}

struct EffectsInner {
    header: Option<NodeId>,
    progress_bar: Option<NodeId>,
    last_offset: Cell<f64>,
    visibility: Cell<HeaderVisibility>,
    skin: Cell<HeaderSkin>,
    progress: Cell<Option<f64>>,
    config: ScrollConfig,
}

impl ScrollEffects {
    /// Register the debounced scroll handler; `None` without header and
    /// progress bar
    pub fn install(
        window: &mut Window,
        elements: &Elements,
        config: &ScrollConfig,
    ) -> Option<Self> {
        if elements.header.is_none() && elements.progress_bar.is_none() {
            tracing::debug!("Scroll effects inert: no header or progress bar");
            return None;
        }

        let effects = Self {
            inner: Rc::new(EffectsInner {
                header: elements.header,
                progress_bar: elements.progress_bar,
                last_offset: Cell::new(window.scroll_y()),
                visibility: Cell::new(HeaderVisibility::Shown),
                skin: Cell::new(HeaderSkin::Resting),
                progress: Cell::new(None),
                config: config.clone(),
            }),
        };

        let this = effects.clone();
        let on_scroll = debounce(config.debounce_ms, move |w: &mut Window, ()| this.update(w));
        window.add_event_listener(EventTarget::Window, EventKind::Scroll, move |w, _| {
            on_scroll(w, ())
        });

        Some(effects)
    }

    pub fn header_visibility(&self) -> HeaderVisibility {
        self.inner.visibility.get()
    }

    pub fn header_skin(&self) -> HeaderSkin {
        self.inner.skin.get()
    }

    /// Last width written to the progress bar, in percent
    pub fn progress_percent(&self) -> Option<f64> {
        self.inner.progress.get()
    }

    /// Apply the current scroll offset immediately
    pub fn update(&self, window: &mut Window) {
        let inner = &self.inner;
        let offset = window.scroll_y();
        let scrollable = window.document_height() - window.viewport().height;

        if let Some(header) = inner.header {
            let scrolling_down = offset > inner.last_offset.get();
            let visibility = if scrolling_down && offset > inner.config.hide_after {
                HeaderVisibility::Hidden
            } else {
                HeaderVisibility::Shown
            };
            let skin = if offset > inner.config.skin_after {
                HeaderSkin::Scrolled
            } else {
                HeaderSkin::Resting
            };

            let doc = window.document_mut();
            doc.set_style(header, "transform", match visibility {
                HeaderVisibility::Hidden => HIDDEN_TRANSFORM,
                HeaderVisibility::Shown => SHOWN_TRANSFORM,
            });
            let (background, shadow) = match skin {
                HeaderSkin::Scrolled => (SCROLLED_BACKGROUND, SCROLLED_SHADOW),
                HeaderSkin::Resting => (RESTING_BACKGROUND, RESTING_SHADOW),
            };
            doc.set_styles(header, &[("background", background), ("box-shadow", shadow)]);

            inner.visibility.set(visibility);
            inner.skin.set(skin);
        }

        if let Some(bar) = inner.progress_bar {
            if scrollable > 0.0 {
                let percent = (100.0 * offset / scrollable).min(100.0);
                window
                    .document_mut()
                    .set_style(bar, "width", &format!("{percent}%"));
                inner.progress.set(Some(percent));
            }
        }

        tracing::trace!("Scroll effects at {}: {:?}", offset, inner.visibility.get());
        inner.last_offset.set(offset);
    }
}
