//! Site orchestrator
//!
//! Waits for the document to be ready, resolves the element cache, installs
//! every controller once and schedules the page-level load effects.

use std::cell::OnceCell;
use std::rc::Rc;

use lumen_dom::ReadyState;
use lumen_window::{EventKind, EventTarget, Window};

use crate::{
    ButtonEffects, Elements, GalleryLightbox, MobileNav, Reveal, ScrollEffects, ScrollToTop,
    SiteConfig, SmoothScroll, TextAnimations,
};

/// Installed controllers; `None` marks a controller left inert by missing
/// markup
pub struct Site {
    pub elements: Elements,
    pub mobile_nav: Option<MobileNav>,
    pub scroll_effects: Option<ScrollEffects>,
    pub reveal: Option<Reveal>,
    pub smooth_scroll: SmoothScroll,
    pub lightbox: Option<GalleryLightbox>,
    pub buttons: Option<ButtonEffects>,
    pub scroll_to_top: Option<ScrollToTop>,
    pub text: TextAnimations,
}

impl Site {
    fn install(window: &mut Window, config: &SiteConfig) -> Self {
        let elements = Elements::resolve(window.document());

        let site = Self {
            mobile_nav: MobileNav::install(window, &elements, &config.nav),
            scroll_effects: ScrollEffects::install(window, &elements, &config.scroll),
            reveal: Reveal::install(window, &config.reveal),
            smooth_scroll: SmoothScroll::install(window, &elements, &config.anchors),
            lightbox: GalleryLightbox::install(window, &config.lightbox),
            buttons: ButtonEffects::install(window, &elements, &config.buttons),
            scroll_to_top: ScrollToTop::install(window, &elements, &config.scroll_to_top),
            text: TextAnimations::install(window, &elements, &config.text),
            elements,
        };

        window.set_timeout(config.app.body_loaded_delay_ms, |w| {
            let body = w.document().body();
            w.document_mut().add_class(body, "loaded");
        });

        let selector = config.app.loading_styles.clone();
        window.set_timeout(config.app.loading_styles_delay_ms, move |w| {
            if let Some(node) = w.document().query_selector(&selector) {
                w.document_mut().remove(node);
                tracing::debug!("Removed {}", selector);
            }
        });

        site
    }

    /// Controllers that found their markup
    pub fn active_controllers(&self) -> usize {
        let optional = [
            self.mobile_nav.is_some(),
            self.scroll_effects.is_some(),
            self.reveal.is_some(),
            self.lightbox.is_some(),
            self.buttons.is_some(),
            self.scroll_to_top.is_some(),
        ];
        // Smooth scroll and text animations always install
        optional.into_iter().filter(|&active| active).count() + 2
    }
}

/// Entry point binding a configuration to a window
pub struct App {
    config: Rc<SiteConfig>,
    site: Rc<OnceCell<Site>>,
}

impl App {
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config: Rc::new(config),
            site: Rc::new(OnceCell::new()),
        }
    }

    /// Set the site up now, or once the document is parsed if it is still
    /// loading. Setup runs at most once however often this is called.
    pub fn mount(&self, window: &mut Window) {
        if window.ready_state() == ReadyState::Loading {
            let (config, site) = (Rc::clone(&self.config), Rc::clone(&self.site));
            window.add_event_listener(
                EventTarget::Document,
                EventKind::DomContentLoaded,
                move |w, _| setup(w, &config, &site),
            );
            tracing::debug!("Document loading, setup deferred");
        } else {
            setup(window, &self.config, &self.site);
        }
    }

    /// Installed site, once setup ran
    pub fn site(&self) -> Option<&Site> {
        self.site.get()
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(SiteConfig::default())
    }
}

fn setup(window: &mut Window, config: &SiteConfig, cell: &OnceCell<Site>) {
    if cell.get().is_some() {
        return;
    }
    let site = Site::install(window, config);
    tracing::info!(
        "Site mounted on {}: {} controllers active",
        window.document().url(),
        site.active_controllers()
    );
    let _ = cell.set(site);
}
