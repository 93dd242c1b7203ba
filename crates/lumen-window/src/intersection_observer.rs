//! Intersection Observer API
//!
//! Observe element visibility and intersection with the viewport.

use std::rc::Rc;
use std::str::FromStr;

use lumen_dom::{DOMRect, Document, NodeId};

use crate::Window;

/// Root margin parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RootMarginError {
    #[error("root margin must have 1 to 4 values, got {0}")]
    Arity(usize),

    #[error("invalid root margin length `{0}` (expected px or %)")]
    Length(String),
}

/// One root margin side
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginLength {
    Px(f64),
    Percent(f64),
}

impl MarginLength {
    fn resolve(self, basis: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => basis * pct / 100.0,
        }
    }
}

impl FromStr for MarginLength {
    type Err = RootMarginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RootMarginError::Length(s.to_string());
        if let Some(num) = s.strip_suffix("px") {
            num.parse().map(Self::Px).map_err(|_| invalid())
        } else if let Some(num) = s.strip_suffix('%') {
            num.parse().map(Self::Percent).map_err(|_| invalid())
        } else if s == "0" {
            Ok(Self::Px(0.0))
        } else {
            Err(invalid())
        }
    }
}

/// CSS-style margin grown (or shrunk, when negative) around the root
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: MarginLength,
    pub right: MarginLength,
    pub bottom: MarginLength,
    pub left: MarginLength,
}

impl RootMargin {
    /// Apply to the root rectangle. Vertical percentages resolve against
    /// the root height, horizontal ones against its width.
    pub fn apply(&self, root: DOMRect) -> DOMRect {
        let top = self.top.resolve(root.height);
        let bottom = self.bottom.resolve(root.height);
        let left = self.left.resolve(root.width);
        let right = self.right.resolve(root.width);
        DOMRect::from_xywh(
            root.x - left,
            root.y - top,
            (root.width + left + right).max(0.0),
            (root.height + top + bottom).max(0.0),
        )
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        let zero = MarginLength::Px(0.0);
        Self {
            top: zero,
            right: zero,
            bottom: zero,
            left: zero,
        }
    }
}

impl FromStr for RootMargin {
    type Err = RootMarginError;

    /// Shorthand order: top, right, bottom, left
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split_whitespace()
            .map(MarginLength::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        let [top, right, bottom, left] = match parts.as_slice() {
            [all] => [*all; 4],
            [v, h] => [*v, *h, *v, *h],
            [t, h, b] => [*t, *h, *b, *h],
            [t, r, b, l] => [*t, *r, *b, *l],
            other => return Err(RootMarginError::Arity(other.len())),
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

/// Intersection observer options
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionObserverOptions {
    /// Root margin
    pub root_margin: RootMargin,
    /// Thresholds to trigger callback
    pub thresholds: Vec<f64>,
}

impl IntersectionObserverOptions {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.thresholds = vec![threshold.clamp(0.0, 1.0)];
        self
    }

    pub fn with_root_margin(mut self, margin: RootMargin) -> Self {
        self.root_margin = margin;
        self
    }
}

impl Default for IntersectionObserverOptions {
    fn default() -> Self {
        Self {
            root_margin: RootMargin::default(),
            thresholds: vec![0.0],
        }
    }
}

/// Intersection observer entry
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionObserverEntry {
    pub target: NodeId,
    /// Target box in client (viewport) coordinates
    pub bounding_client_rect: DOMRect,
    pub intersection_rect: DOMRect,
    pub root_bounds: DOMRect,
    pub intersection_ratio: f64,
    pub is_intersecting: bool,
    pub time: u64,
}

/// Handle returned by `create_intersection_observer`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Observer callback
pub type ObserverCallback = Rc<dyn Fn(&mut Window, &[IntersectionObserverEntry])>;

/// Intersection observer
pub(crate) struct IntersectionObserver {
    id: ObserverId,
    options: IntersectionObserverOptions,
    /// Targets with their last reported ratio and intersecting state
    observed: Vec<(NodeId, Option<(f64, bool)>)>,
    callback: ObserverCallback,
}

impl IntersectionObserver {
    /// Observe an element
    pub(crate) fn observe(&mut self, target: NodeId) {
        if !self.observed.iter().any(|(n, _)| *n == target) {
            self.observed.push((target, None));
        }
    }

    /// Stop observing
    pub(crate) fn unobserve(&mut self, target: NodeId) {
        self.observed.retain(|(n, _)| *n != target);
    }

    /// Compute entries for targets that crossed a threshold
    ///
    /// `root` is the margin-adjusted viewport in page coordinates.
    fn check_intersections(
        &mut self,
        document: &Document,
        root: DOMRect,
        scroll_y: f64,
        time: u64,
    ) -> Vec<IntersectionObserverEntry> {
        let mut entries = Vec::new();

        for (node, last) in &mut self.observed {
            if !document.is_connected(*node) {
                continue;
            }
            let Some(rect) = document.layout(*node) else {
                continue;
            };

            let intersection = rect.intersection(&root);
            let ratio = match intersection {
                Some(i) if rect.area() > 0.0 => i.area() / rect.area(),
                Some(_) => 1.0,
                None => 0.0,
            };

            let is_intersecting = intersection.is_some() && ratio > 0.0;

            // Entering or leaving counts as a crossing at any threshold
            let should_notify = match *last {
                Some((lr, was_intersecting)) => {
                    was_intersecting != is_intersecting
                        || self
                            .options
                            .thresholds
                            .iter()
                            .any(|&t| (lr < t && ratio >= t) || (lr >= t && ratio < t))
                }
                None => true,
            };

            if should_notify {
                *last = Some((ratio, is_intersecting));
                entries.push(IntersectionObserverEntry {
                    target: *node,
                    bounding_client_rect: rect.to_client(scroll_y),
                    intersection_rect: intersection.unwrap_or_default().to_client(scroll_y),
                    root_bounds: root.to_client(scroll_y),
                    intersection_ratio: ratio,
                    is_intersecting,
                    time,
                });
            }
        }

        entries
    }
}

/// Intersection observer manager
#[derive(Default)]
pub(crate) struct IntersectionObserverManager {
    next_id: u64,
    observers: Vec<IntersectionObserver>,
}

impl IntersectionObserverManager {
    /// Create observer
    pub(crate) fn create(
        &mut self,
        options: IntersectionObserverOptions,
        callback: ObserverCallback,
    ) -> ObserverId {
        self.next_id += 1;
        let id = ObserverId(self.next_id);
        self.observers.push(IntersectionObserver {
            id,
            options,
            observed: Vec::new(),
            callback,
        });
        id
    }

    /// Get observer
    pub(crate) fn get_mut(&mut self, id: ObserverId) -> Option<&mut IntersectionObserver> {
        self.observers.iter_mut().find(|o| o.id == id)
    }

    /// Remove observer
    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| o.id != id);
        self.observers.len() != before
    }

    /// Anything to compute on the next frame
    pub(crate) fn has_targets(&self) -> bool {
        self.observers.iter().any(|o| !o.observed.is_empty())
    }

    /// Process all observers, pairing each batch with its callback
    pub(crate) fn process(
        &mut self,
        document: &Document,
        viewport: DOMRect,
        time: u64,
    ) -> Vec<(ObserverCallback, Vec<IntersectionObserverEntry>)> {
        let mut results = Vec::new();
        for observer in &mut self.observers {
            let root = observer.options.root_margin.apply(viewport);
            let entries = observer.check_intersections(document, root, viewport.y, time);
            if !entries.is_empty() {
                results.push((Rc::clone(&observer.callback), entries));
            }
        }
        results
    }
}
