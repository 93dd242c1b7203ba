//! Element boxes
//!
//! Boxes live in page coordinates and are assigned by the host, since
//! nothing here does layout. Only the vertical axis ever scrolls.

/// Axis-aligned box (`getBoundingClientRect` shape)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Page offset of the lower edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Covered area; negative extents count as empty
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlap with `other`
    ///
    /// Boxes that only touch along an edge still overlap, with zero area,
    /// which lets an observer tell "at the edge" from "far away".
    pub fn intersection(&self, other: &DOMRect) -> Option<DOMRect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = self.bottom().min(other.bottom());

        (right >= left && bottom >= top)
            .then(|| DOMRect::from_xywh(left, top, right - left, bottom - top))
    }

    /// The same box seen from a viewport scrolled down by `scroll_y`
    pub fn to_client(&self, scroll_y: f64) -> DOMRect {
        DOMRect::from_xywh(self.x, self.y - scroll_y, self.width, self.height)
    }
}
