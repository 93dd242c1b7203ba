//! Site configuration.
//!
//! Every section and field is optional; an empty file yields the defaults
//! the controllers were tuned with.
//!
//! # Example
//!
//! ```toml
//! [scroll]
//! debounce_ms = 10        # Scroll handler debounce window
//! hide_after = 100.0      # Header hides when scrolling down past this offset
//! skin_after = 50.0       # Header switches to the scrolled skin past this offset
//!
//! [reveal]
//! selectors = [".service-card", ".gallery-item"]
//! threshold = 0.1
//! root_margin = "0px 0px -50px 0px"
//!
//! [lightbox]
//! single_instance = true  # Close an open lightbox before opening another
//! ```

use std::fs;
use std::path::Path;

use lumen_dom::SelectorList;
use lumen_window::RootMargin;
use serde::Deserialize;

use crate::ConfigError;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub scroll: ScrollConfig,
    pub nav: NavConfig,
    pub reveal: RevealConfig,
    pub anchors: AnchorsConfig,
    pub lightbox: LightboxConfig,
    pub buttons: ButtonsConfig,
    pub scroll_to_top: ScrollToTopConfig,
    pub text: TextConfig,
    pub app: AppConfig,
}

impl SiteConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded site config from {}", path.display());
        Ok(config)
    }

    /// Check values the controllers cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_fraction("reveal.threshold", self.reveal.threshold)?;
        self.reveal
            .root_margin
            .parse::<RootMargin>()
            .map_err(|e| ConfigError::Invalid(format!("reveal.root_margin: {e}")))?;
        for selector in &self.reveal.selectors {
            check_selector("reveal.selectors", selector)?;
        }
        check_selector("buttons.cta_target", &self.buttons.cta_target)?;
        check_selector("app.loading_styles", &self.app.loading_styles)?;

        for (field, class) in [
            ("nav.active_class", &self.nav.active_class),
            ("reveal.class", &self.reveal.class),
            ("anchors.active_class", &self.anchors.active_class),
            ("scroll_to_top.class", &self.scroll_to_top.class),
        ] {
            if class.is_empty() || class.contains(char::is_whitespace) {
                return Err(ConfigError::Invalid(format!(
                    "{field}: `{class}` is not a single class name"
                )));
            }
        }
        Ok(())
    }
}

fn check_fraction(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{field}: {value} is outside 0..=1")))
    }
}

fn check_selector(field: &str, selector: &str) -> Result<(), ConfigError> {
    SelectorList::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::Invalid(format!("{field}: `{selector}`: {e}")))
}

/// `[scroll]` header and progress bar behavior.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    pub debounce_ms: u64,
    /// Offset past which scrolling down hides the header
    pub hide_after: f64,
    /// Offset past which the header wears its scrolled skin
    pub skin_after: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 10,
            hide_after: 100.0,
            skin_after: 50.0,
        }
    }
}

/// `[nav]` mobile menu.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    pub active_class: String,
    /// Viewport width above which an open menu closes itself
    pub desktop_breakpoint: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            active_class: "active".to_string(),
            desktop_breakpoint: 768.0,
        }
    }
}

/// `[reveal]` one-way entrance animations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    pub selectors: Vec<String>,
    pub threshold: f64,
    pub root_margin: String,
    pub class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selectors: [
                ".section-title",
                ".service-card",
                ".gallery-item",
                ".about-content",
                ".testimonial",
                ".contact-card",
            ]
            .map(String::from)
            .to_vec(),
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
            class: "revealed".to_string(),
        }
    }
}

/// `[anchors]` smooth anchor scrolling and active link tracking.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnchorsConfig {
    pub throttle_ms: u64,
    /// How far above a section its link already counts as active
    pub activation_offset: f64,
    pub active_class: String,
}

impl Default for AnchorsConfig {
    fn default() -> Self {
        Self {
            throttle_ms: 100,
            activation_offset: 100.0,
            active_class: "active".to_string(),
        }
    }
}

/// `[lightbox]` gallery overlay.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightboxConfig {
    /// Fade-out length; the overlay is removed once it ends
    pub fade_ms: u64,
    pub single_instance: bool,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            fade_ms: 300,
            single_instance: false,
        }
    }
}

/// `[buttons]` press feedback and the call-to-action target.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ButtonsConfig {
    pub press_ms: u64,
    pub button_transform: String,
    pub card_transform: String,
    pub cta_target: String,
}

impl Default for ButtonsConfig {
    fn default() -> Self {
        Self {
            press_ms: 150,
            button_transform: "scale(0.95)".to_string(),
            card_transform: "scale(0.98)".to_string(),
            cta_target: "#services".to_string(),
        }
    }
}

/// `[scroll_to_top]` floating button.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollToTopConfig {
    pub threshold: f64,
    pub debounce_ms: u64,
    pub class: String,
}

impl Default for ScrollToTopConfig {
    fn default() -> Self {
        Self {
            threshold: 500.0,
            debounce_ms: 100,
            class: "visible".to_string(),
        }
    }
}

/// `[text]` title animation timing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    pub hero_delay_ms: u64,
    pub hero_step_ms: u64,
    pub services_delay_ms: u64,
    pub services_step_ms: u64,
    pub services_loaded_delay_ms: u64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            hero_delay_ms: 500,
            hero_step_ms: 100,
            services_delay_ms: 300,
            services_step_ms: 100,
            services_loaded_delay_ms: 200,
        }
    }
}

/// `[app]` page-level load effects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub body_loaded_delay_ms: u64,
    pub loading_styles_delay_ms: u64,
    /// Element removed once the page has settled
    pub loading_styles: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            body_loaded_delay_ms: 100,
            loading_styles_delay_ms: 2000,
            loading_styles: "#loading-styles".to_string(),
        }
    }
}
