//! Scrolling
//!
//! `window.scrollTo` options and the per-frame smooth scroll animation.

/// Default length of a smooth scroll
pub const SMOOTH_SCROLL_MS: u64 = 400;

/// Scroll behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
}

/// Scroll options
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollToOptions {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

impl ScrollToOptions {
    /// Jump immediately
    pub fn instant(top: f64) -> Self {
        Self {
            top,
            behavior: ScrollBehavior::Auto,
        }
    }

    /// Animate over the window's smooth-scroll duration
    pub fn smooth(top: f64) -> Self {
        Self {
            top,
            behavior: ScrollBehavior::Smooth,
        }
    }
}

/// Easing function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

impl Easing {
    /// Map linear progress in [0, 1] to eased progress
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// A running smooth scroll
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScrollAnimation {
    pub(crate) from: f64,
    pub(crate) to: f64,
    pub(crate) start: u64,
    pub(crate) duration: u64,
    pub(crate) easing: Easing,
}

impl ScrollAnimation {
    /// Offset at `now`, and whether the animation has finished
    pub(crate) fn sample(&self, now: u64) -> (f64, bool) {
        if self.duration == 0 {
            return (self.to, true);
        }
        let elapsed = now.saturating_sub(self.start) as f64;
        let t = elapsed / self.duration as f64;
        if t >= 1.0 {
            return (self.to, true);
        }
        let eased = self.easing.apply(t);
        (self.from + (self.to - self.from) * eased, false)
    }
}
