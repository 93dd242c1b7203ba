//! Lumen Site - marketing page behaviors
//!
//! Independent controllers wired onto a [`lumen_window::Window`]: mobile
//! navigation, scroll-driven header and progress bar, reveal-on-scroll,
//! smooth anchor scrolling, a gallery lightbox, button press feedback, a
//! scroll-to-top button and title animations. [`App`] installs them once
//! the document is ready.
//!
//! ```ignore
//! let document = lumen_html::parse(html)?;
//! let mut window = Window::new(document, Viewport::new(1280.0, 800.0));
//! let app = App::new(SiteConfig::load(Path::new("lumen.toml"))?);
//! app.mount(&mut window);
//! window.finish_loading();
//! window.advance(2_000);
//! ```

mod app;
mod button_effects;
mod config;
mod elements;
mod error;
mod lightbox;
mod mobile_nav;
mod rate_limit;
mod reveal;
mod scroll_effects;
mod scroll_to_top;
mod smooth_scroll;
mod text_animations;

pub use app::{App, Site};
pub use button_effects::{ButtonEffects, press};
pub use config::{
    AnchorsConfig, AppConfig, ButtonsConfig, LightboxConfig, NavConfig, RevealConfig,
    ScrollConfig, ScrollToTopConfig, SiteConfig, TextConfig,
};
pub use elements::Elements;
pub use error::ConfigError;
pub use lightbox::{GalleryLightbox, OverlayState};
pub use mobile_nav::{MobileNav, NavState};
pub use rate_limit::{debounce, throttle};
pub use reveal::Reveal;
pub use scroll_effects::{HeaderSkin, HeaderVisibility, ScrollEffects};
pub use scroll_to_top::ScrollToTop;
pub use smooth_scroll::{SmoothScroll, active_section};
pub use text_animations::{TextAnimations, split_words};
