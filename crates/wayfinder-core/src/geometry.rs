#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are CSS-style pixels stored as `f64`. Nothing here rounds; the
//! host layout decides how fractional pixels are snapped.

use serde::{Deserialize, Serialize};

/// An axis-aligned box, as reported by the host for an anchor element.
///
/// Coordinates are relative to whatever frame the producer uses (viewport
/// for live element geometry, document for placed overlays). Origin is
/// top-left; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl BoundingBox {
    /// Create a new box.
    #[inline]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Horizontal center.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    /// Vertical center.
    #[inline]
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Return a copy moved by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// Replace non-finite components with zero and negative sizes with zero.
    ///
    /// Host geometry is read at arbitrary times (mid-transition, detached
    /// nodes) and may carry NaN or inverted extents.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self::new(
            finite_or_zero(self.left),
            finite_or_zero(self.top),
            finite_or_zero(self.width).max(0.0),
            finite_or_zero(self.height).max(0.0),
        )
    }

    /// Size of the box.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamp both dimensions to finite, non-negative values.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self::new(
            finite_or_zero(self.width).max(0.0),
            finite_or_zero(self.height).max(0.0),
        )
    }
}

/// Horizontal margins kept free at the viewport edges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
}

impl Margins {
    /// Create new margins.
    pub const fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Equal margin on both sides.
    pub const fn symmetric(val: f64) -> Self {
        Self::new(val, val)
    }
}

impl From<f64> for Margins {
    fn from(val: f64) -> Self {
        Self::symmetric(val)
    }
}

impl From<(f64, f64)> for Margins {
    fn from((left, right): (f64, f64)) -> Self {
        Self::new(left, right)
    }
}

#[inline]
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
