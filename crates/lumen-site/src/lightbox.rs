//! Gallery lightbox
//!
//! Clicking a gallery image opens a full-viewport overlay showing it. The
//! overlay fades in on the next frame, locks page scroll while open, and
//! closes on a backdrop click, the close button or Escape. After the fade
//! out it is removed from the document.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lumen_dom::{Document, NodeId};
use lumen_window::{EventKind, EventTarget, ListenerId, Window};

use crate::config::LightboxConfig;

const OVERLAY_STYLES: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "0"),
    ("left", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("background", "rgba(0, 0, 0, 0.9)"),
    ("display", "flex"),
    ("align-items", "center"),
    ("justify-content", "center"),
    ("z-index", "10000"),
    ("opacity", "0"),
    ("transition", "opacity 0.3s ease"),
];

const CONTENT_STYLES: &[(&str, &str)] = &[
    ("position", "relative"),
    ("max-width", "90%"),
    ("max-height", "90%"),
];

const IMAGE_STYLES: &[(&str, &str)] = &[
    ("max-width", "100%"),
    ("max-height", "90vh"),
    ("object-fit", "contain"),
    ("border-radius", "8px"),
];

const CLOSE_STYLES: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("top", "-40px"),
    ("right", "0"),
    ("background", "white"),
    ("border", "none"),
    ("border-radius", "50%"),
    ("width", "30px"),
    ("height", "30px"),
    ("font-size", "20px"),
    ("cursor", "pointer"),
];

/// Lifecycle of one overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Open,
    Closing,
}

struct Overlay {
    root: NodeId,
    image: NodeId,
    close_button: NodeId,
    state: Cell<OverlayState>,
    escape: Cell<Option<ListenerId>>,
    node_listeners: RefCell<Vec<ListenerId>>,
}

struct LightboxInner {
    config: LightboxConfig,
    open: RefCell<Vec<Rc<Overlay>>>,
}

/// Image overlay controller
#[derive(Clone)]
pub struct GalleryLightbox {
    inner: Rc<LightboxInner>,
}

impl GalleryLightbox {
    /// Make every `.gallery-item img` open the lightbox
    pub fn install(window: &mut Window, config: &LightboxConfig) -> Option<Self> {
        let images = window.document().query_selector_all(".gallery-item img");
        if images.is_empty() {
            tracing::debug!("Lightbox inert: no gallery images");
            return None;
        }

        let lightbox = Self {
            inner: Rc::new(LightboxInner {
                config: config.clone(),
                open: RefCell::new(Vec::new()),
            }),
        };

        for &image in &images {
            window.document_mut().set_style(image, "cursor", "pointer");
            let this = lightbox.clone();
            window.add_event_listener(EventTarget::Node(image), EventKind::Click, move |w, _| {
                this.open(w, image);
            });
        }

        tracing::debug!("Lightbox wired on {} images", images.len());
        Some(lightbox)
    }

    /// Open an overlay for `image`, returning the overlay root
    pub fn open(&self, window: &mut Window, image: NodeId) -> NodeId {
        if self.inner.config.single_instance {
            self.close_all(window);
        }

        let overlay = Rc::new(build_overlay(window.document_mut(), image));
        let root = overlay.root;
        let doc = window.document_mut();
        let body = doc.body();
        doc.append_child(body, root);
        doc.set_style(body, "overflow", "hidden");

        let fading_in = Rc::clone(&overlay);
        window.request_animation_frame(move |w| {
            if fading_in.state.get() == OverlayState::Open {
                w.document_mut().set_style(fading_in.root, "opacity", "1");
            }
        });

        let (this, target) = (self.clone(), Rc::clone(&overlay));
        let backdrop = window.add_event_listener(
            EventTarget::Node(root),
            EventKind::Click,
            move |w, event| {
                if event.target() == EventTarget::Node(target.root) {
                    this.close(w, &target);
                }
            },
        );
        let (this, target) = (self.clone(), Rc::clone(&overlay));
        let button = window.add_event_listener(
            EventTarget::Node(overlay.close_button),
            EventKind::Click,
            move |w, _| this.close(w, &target),
        );
        let (this, target) = (self.clone(), Rc::clone(&overlay));
        let escape = window.add_event_listener(
            EventTarget::Document,
            EventKind::KeyDown,
            move |w, event| {
                if event.key() == Some("Escape") {
                    this.close(w, &target);
                }
            },
        );
        overlay.node_listeners.borrow_mut().extend([backdrop, button]);
        overlay.escape.set(Some(escape));

        self.inner.open.borrow_mut().push(overlay);
        tracing::debug!("Lightbox opened ({} open)", self.open_count());
        root
    }

    /// Close every open overlay
    pub fn close_all(&self, window: &mut Window) {
        let open: Vec<Rc<Overlay>> = self.inner.open.borrow().clone();
        for overlay in open {
            self.close(window, &overlay);
        }
    }

    /// Overlays not yet closing
    pub fn open_count(&self) -> usize {
        self.inner.open.borrow().len()
    }

    /// Roots of the overlays not yet closing
    pub fn overlays(&self) -> Vec<NodeId> {
        self.inner.open.borrow().iter().map(|o| o.root).collect()
    }

    /// Image element shown in an open overlay
    pub fn overlay_image(&self, root: NodeId) -> Option<NodeId> {
        self.inner
            .open
            .borrow()
            .iter()
            .find(|o| o.root == root)
            .map(|o| o.image)
    }

    fn close(&self, window: &mut Window, overlay: &Rc<Overlay>) {
        if overlay.state.get() == OverlayState::Closing {
            return;
        }
        overlay.state.set(OverlayState::Closing);
        self.inner.open.borrow_mut().retain(|o| !Rc::ptr_eq(o, overlay));

        let doc = window.document_mut();
        doc.set_style(overlay.root, "opacity", "0");
        let body = doc.body();
        doc.remove_style(body, "overflow");

        if let Some(escape) = overlay.escape.take() {
            window.remove_event_listener(escape);
        }

        let root = overlay.root;
        let node_listeners = overlay.node_listeners.take();
        window.set_timeout(self.inner.config.fade_ms, move |w| {
            w.document_mut().remove(root);
            for id in node_listeners {
                w.remove_event_listener(id);
            }
            tracing::debug!("Lightbox overlay removed");
        });
    }
}

fn build_overlay(doc: &mut Document, source: NodeId) -> Overlay {
    let root = doc.create_element("div");
    doc.add_class(root, "lightbox");
    doc.set_styles(root, OVERLAY_STYLES);

    let content = doc.create_element("div");
    doc.add_class(content, "lightbox-content");
    doc.set_styles(content, CONTENT_STYLES);

    let image = doc.create_element("img");
    let src = doc.get_attribute(source, "src").unwrap_or_default().to_string();
    let alt = doc.get_attribute(source, "alt").unwrap_or_default().to_string();
    doc.set_attribute(image, "src", &src);
    doc.set_attribute(image, "alt", &alt);
    doc.set_styles(image, IMAGE_STYLES);

    let close_button = doc.create_element("button");
    doc.add_class(close_button, "lightbox-close");
    doc.set_text_content(close_button, "\u{00d7}");
    doc.set_styles(close_button, CLOSE_STYLES);

    doc.append_child(content, image);
    doc.append_child(content, close_button);
    doc.append_child(root, content);

    Overlay {
        root,
        image,
        close_button,
        state: Cell::new(OverlayState::Open),
        escape: Cell::new(None),
        node_listeners: RefCell::new(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use lumen_window::Viewport;

    use super::*;

    fn setup(config: LightboxConfig) -> (Window, GalleryLightbox, NodeId) {
        let mut doc = Document::default();
        let body = doc.body();
        let item = doc.create_element("div");
        doc.set_attribute(item, "class", "gallery-item");
        let img = doc.create_element("img");
        doc.set_attribute(img, "src", "/img/a.jpg");
        doc.set_attribute(img, "alt", "A");
        doc.append_child(body, item);
        doc.append_child(item, img);

        let mut window = Window::new(doc, Viewport::default());
        let lightbox = GalleryLightbox::install(&mut window, &config).unwrap();
        (window, lightbox, img)
    }

    #[test]
    fn test_open_builds_overlay() {
        let (mut window, lightbox, img) = setup(LightboxConfig::default());
        assert_eq!(window.document().style(img, "cursor"), Some("pointer"));

        window.click(img);
        let overlays = window.document().query_selector_all(".lightbox");
        assert_eq!(overlays.len(), 1);
        assert_eq!(lightbox.overlays(), overlays);

        let shown = lightbox.overlay_image(overlays[0]).unwrap();
        assert_eq!(window.document().get_attribute(shown, "src"), Some("/img/a.jpg"));
        assert_eq!(window.document().get_attribute(shown, "alt"), Some("A"));
        assert!(window.is_scroll_locked());

        assert_eq!(window.document().style(overlays[0], "opacity"), Some("0"));
        window.advance(16);
        assert_eq!(window.document().style(overlays[0], "opacity"), Some("1"));
    }

    #[test]
    fn test_escape_closes_after_fade() {
        let (mut window, lightbox, img) = setup(LightboxConfig::default());
        window.click(img);
        let overlay = lightbox.overlays()[0];

        window.key_down("Enter");
        assert_eq!(lightbox.open_count(), 1);

        window.key_down("Escape");
        assert_eq!(lightbox.open_count(), 0);
        assert!(!window.is_scroll_locked());
        assert_eq!(window.document().style(overlay, "opacity"), Some("0"));
        assert_eq!(window.listener_count(EventTarget::Document, EventKind::KeyDown), 0);

        window.advance(299);
        assert!(window.document().is_connected(overlay));
        window.advance(1);
        assert!(!window.document().is_connected(overlay));
    }

    #[test]
    fn test_content_click_keeps_open() {
        let (mut window, lightbox, img) = setup(LightboxConfig::default());
        let root = lightbox.open(&mut window, img);
        let shown = lightbox.overlay_image(root).unwrap();

        window.click(shown);
        assert_eq!(lightbox.open_count(), 1);

        window.click(root);
        assert_eq!(lightbox.open_count(), 0);
        window.advance(300);
        assert!(window.document().query_selector(".lightbox").is_none());
    }

    #[test]
    fn test_close_button() {
        let (mut window, lightbox, img) = setup(LightboxConfig::default());
        let root = lightbox.open(&mut window, img);
        let button = window.document().query_selector(".lightbox-close").unwrap();
        assert_eq!(window.document().text_content(button), "\u{00d7}");

        window.click(button);
        assert_eq!(lightbox.open_count(), 0);
        window.advance(300);
        assert!(!window.document().is_connected(root));
    }

    #[test]
    fn test_permissive_by_default() {
        let (mut window, lightbox, img) = setup(LightboxConfig::default());
        window.click(img);
        window.click(img);
        assert_eq!(lightbox.open_count(), 2);

        // One Escape closes both
        window.key_down("Escape");
        assert_eq!(lightbox.open_count(), 0);
    }

    #[test]
    fn test_single_instance() {
        let config = LightboxConfig {
            single_instance: true,
            ..LightboxConfig::default()
        };
        let (mut window, lightbox, img) = setup(config);
        let first = lightbox.open(&mut window, img);
        let second = lightbox.open(&mut window, img);

        assert_eq!(lightbox.overlays(), vec![second]);
        window.advance(300);
        assert!(!window.document().is_connected(first));
        assert!(window.document().is_connected(second));
    }
}
