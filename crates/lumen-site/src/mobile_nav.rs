//! Mobile navigation toggle

use std::cell::Cell;
use std::rc::Rc;

use lumen_dom::NodeId;
use lumen_window::{EventKind, EventTarget, Window};

use crate::config::NavConfig;
use crate::Elements;

/// Menu state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavState {
    #[default]
    Closed,
    Open,
}

/// Hamburger-driven menu panel
#[derive(Clone)]
pub struct MobileNav {
    inner: Rc<NavInner>,
}

struct NavInner {
    hamburger: NodeId,
    menu: NodeId,
    state: Cell<NavState>,
    config: NavConfig,
}

impl MobileNav {
    /// Wire the hamburger, menu links and resize handling
    ///
    /// Returns `None` without wiring anything when the hamburger or the menu
    /// is missing.
    pub fn install(window: &mut Window, elements: &Elements, config: &NavConfig) -> Option<Self> {
        let (Some(hamburger), Some(menu)) = (elements.hamburger, elements.nav_menu) else {
            tracing::debug!("Mobile nav inert: hamburger or menu missing");
            return None;
        };

        let nav = Self {
            inner: Rc::new(NavInner {
                hamburger,
                menu,
                state: Cell::new(NavState::Closed),
                config: config.clone(),
            }),
        };

        let this = nav.clone();
        window.add_event_listener(EventTarget::Node(hamburger), EventKind::Click, move |w, _| {
            this.toggle(w);
        });

        let links = window.document().query_selector_within(menu, "a");
        for link in &links {
            let this = nav.clone();
            window.add_event_listener(EventTarget::Node(*link), EventKind::Click, move |w, _| {
                this.close(w);
            });
        }

        let this = nav.clone();
        window.add_event_listener(EventTarget::Window, EventKind::Resize, move |w, _| {
            if w.viewport().width > this.inner.config.desktop_breakpoint {
                this.close(w);
            }
        });

        tracing::debug!("Mobile nav wired with {} links", links.len());
        Some(nav)
    }

    pub fn state(&self) -> NavState {
        self.inner.state.get()
    }

    /// Flip between open and closed
    pub fn toggle(&self, window: &mut Window) {
        let next = match self.state() {
            NavState::Closed => NavState::Open,
            NavState::Open => NavState::Closed,
        };
        self.apply(window, next);
    }

    /// Force the closed state
    pub fn close(&self, window: &mut Window) {
        if self.state() == NavState::Open {
            self.apply(window, NavState::Closed);
        }
    }

    fn apply(&self, window: &mut Window, state: NavState) {
        let inner = &self.inner;
        let open = state == NavState::Open;
        let doc = window.document_mut();

        doc.set_class(inner.hamburger, &inner.config.active_class, open);
        doc.set_class(inner.menu, &inner.config.active_class, open);

        let body = doc.body();
        if open {
            doc.set_style(body, "overflow", "hidden");
        } else {
            doc.remove_style(body, "overflow");
        }

        inner.state.set(state);
        tracing::debug!("Mobile nav {:?}", state);
    }
}

#[cfg(test)]
mod tests {
    use lumen_dom::Document;
    use lumen_window::Viewport;

    use super::*;

    fn setup() -> (Window, Elements, NodeId) {
        let mut doc = Document::default();
        let body = doc.body();
        let hamburger = doc.create_element("button");
        doc.set_attribute(hamburger, "class", "hamburger");
        let menu = doc.create_element("ul");
        doc.set_attribute(menu, "class", "nav-menu");
        let link = doc.create_element("a");
        doc.set_attribute(link, "href", "#about");
        doc.append_child(body, hamburger);
        doc.append_child(body, menu);
        doc.append_child(menu, link);

        let elements = Elements::resolve(&doc);
        (Window::new(doc, Viewport::new(375.0, 700.0)), elements, link)
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let (mut window, elements, _) = setup();
        let nav = MobileNav::install(&mut window, &elements, &NavConfig::default()).unwrap();
        let menu = elements.nav_menu.unwrap();

        nav.toggle(&mut window);
        assert_eq!(nav.state(), NavState::Open);
        assert!(window.document().has_class(menu, "active"));
        assert!(window.is_scroll_locked());

        nav.toggle(&mut window);
        assert_eq!(nav.state(), NavState::Closed);
        assert!(!window.document().has_class(menu, "active"));
        assert!(!window.document().has_class(elements.hamburger.unwrap(), "active"));
        assert!(!window.is_scroll_locked());
    }

    #[test]
    fn test_link_click_closes() {
        let (mut window, elements, link) = setup();
        let nav = MobileNav::install(&mut window, &elements, &NavConfig::default()).unwrap();

        window.click(elements.hamburger.unwrap());
        assert_eq!(nav.state(), NavState::Open);
        window.click(link);
        assert_eq!(nav.state(), NavState::Closed);
    }

    #[test]
    fn test_resize_to_desktop_closes() {
        let (mut window, elements, _) = setup();
        let nav = MobileNav::install(&mut window, &elements, &NavConfig::default()).unwrap();

        nav.toggle(&mut window);
        window.resize(600.0, 700.0);
        assert_eq!(nav.state(), NavState::Open);
        window.resize(1024.0, 700.0);
        assert_eq!(nav.state(), NavState::Closed);
    }

    #[test]
    fn test_inert_without_menu() {
        let mut window = Window::new(Document::default(), Viewport::default());
        let elements = Elements::resolve(window.document());
        assert!(MobileNav::install(&mut window, &elements, &NavConfig::default()).is_none());
        assert_eq!(window.listener_count(EventTarget::Window, EventKind::Resize), 0);
    }
}
