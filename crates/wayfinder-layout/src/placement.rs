#![forbid(unsafe_code)]

//! Callout placement relative to an anchor box.
//!
//! [`PositionEngine::place`] computes where a tour callout goes: which side of
//! the anchor it sits on, its top/left corner, and the offset of the arrow that
//! points back at the anchor. It is a pure function of a [`PlacementRequest`];
//! the caller reads live geometry and the engine never inspects the host.
//!
//! # Algorithm
//!
//! Each side has its own formula:
//!
//! - **Bottom**: below the anchor, horizontally centered, clipped to the
//!   margins. The arrow follows the clip so it keeps pointing at the anchor.
//! - **Top**: mirror of bottom, above the anchor.
//! - **Right** / **Left**: beside the anchor, vertically centered.
//! - **Center**: middle of the viewport, no arrow.
//!
//! When the requested side overflows its bound, the engine *autofixes* by
//! switching once along the cascade `top → right → bottom → left → top`.
//! Exactly one hop is taken: the fallback side's formula is applied directly
//! and its own overflow is not consulted. The result is then clamped into the
//! layout bounds, so a callout never starts outside the viewport width or the
//! document height even for pathological inputs.
//!
//! # Coordinate frames
//!
//! Anchor boxes are viewport-relative (what `getBoundingClientRect` reports).
//! In [`PositioningMode::Absolute`] the engine adds the scroll offsets and
//! produces document coordinates bounded by the document height. In
//! [`PositioningMode::Fixed`] it stays viewport-relative and is bounded by the
//! viewport height.
//!
//! # Example
//!
//! ```
//! use wayfinder_core::{BoundingBox, Size, ViewportSnapshot};
//! use wayfinder_layout::{PlacementRequest, PositionEngine, Side};
//!
//! let anchor = BoundingBox::new(10.0, 10.0, 100.0, 50.0);
//! let viewport = ViewportSnapshot::new(1024.0, 80.0, 80.0);
//! let request = PlacementRequest::new(anchor, Size::new(300.0, 100.0), viewport)
//!     .side(Side::Top)
//!     .distance(15.0);
//!
//! let placement = PositionEngine::place(&request);
//! assert_eq!(placement.side, Side::Right);
//! assert_eq!(placement.left, 125.0);
//! ```

use serde::{Deserialize, Serialize};
use wayfinder_core::{BoundingBox, Margins, Size, ViewportSnapshot};

/// Where to place the callout relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Above the anchor, horizontally centered.
    Top,
    /// Below the anchor, horizontally centered.
    #[default]
    Bottom,
    /// Left of the anchor, vertically centered.
    Left,
    /// Right of the anchor, vertically centered.
    Right,
    /// Middle of the viewport, not anchored.
    Center,
}

impl Side {
    /// All sides, in declaration order.
    pub const ALL: [Side; 5] = [
        Side::Top,
        Side::Bottom,
        Side::Left,
        Side::Right,
        Side::Center,
    ];

    /// The side to switch to when this one overflows.
    ///
    /// `Center` is never autofixed.
    pub const fn autofix(self) -> Option<Side> {
        match self {
            Self::Top => Some(Self::Right),
            Self::Right => Some(Self::Bottom),
            Self::Bottom => Some(Self::Left),
            Self::Left => Some(Self::Top),
            Self::Center => None,
        }
    }

    /// Whether the callout is stacked above/below the anchor.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// Lowercase name, matching the serialized form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
        }
    }
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the overlay is attached to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositioningMode {
    /// Viewport-relative; used when the anchor (or an ancestor) is CSS-fixed.
    Fixed,
    /// Document-relative; scroll offsets are added.
    #[default]
    Absolute,
}

impl PositioningMode {
    /// Pick the mode from the anchor's fixed-positioning flag.
    #[inline]
    pub const fn for_anchor(is_fixed: bool) -> Self {
        if is_fixed { Self::Fixed } else { Self::Absolute }
    }
}

/// Everything the engine needs to place one callout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    /// Anchor geometry, viewport-relative.
    pub target: BoundingBox,
    /// Requested side.
    pub side: Side,
    /// Gap between anchor and callout.
    pub distance: f64,
    /// Arrow size (half the arrow's box edge).
    pub arrow_size: f64,
    /// Measured callout size.
    pub overlay: Size,
    /// Current viewport state.
    pub viewport: ViewportSnapshot,
    /// Horizontal margins kept free at the viewport edges.
    pub margins: Margins,
    /// Fixed or absolute attachment.
    pub mode: PositioningMode,
    /// Whether to switch sides on overflow.
    pub auto_fix: bool,
}

impl PlacementRequest {
    /// Create a request with default side (bottom), no gap, no arrow, no
    /// margins, absolute mode and autofix enabled.
    pub fn new(target: BoundingBox, overlay: Size, viewport: ViewportSnapshot) -> Self {
        Self {
            target,
            side: Side::default(),
            distance: 0.0,
            arrow_size: 0.0,
            overlay,
            viewport,
            margins: Margins::default(),
            mode: PositioningMode::default(),
            auto_fix: true,
        }
    }

    /// Set the requested side.
    #[must_use]
    pub fn side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Set the gap between anchor and callout.
    #[must_use]
    pub fn distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Set the arrow size.
    #[must_use]
    pub fn arrow_size(mut self, size: f64) -> Self {
        self.arrow_size = size;
        self
    }

    /// Set the horizontal margins.
    #[must_use]
    pub fn margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = margins.into();
        self
    }

    /// Set the positioning mode.
    #[must_use]
    pub fn mode(mut self, mode: PositioningMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable or disable autofix.
    #[must_use]
    pub fn auto_fix(mut self, enabled: bool) -> Self {
        self.auto_fix = enabled;
        self
    }

    fn sanitized(&self) -> Self {
        let mut viewport = self.viewport;
        viewport.scroll_x = finite_or_zero(viewport.scroll_x);
        viewport.scroll_y = finite_or_zero(viewport.scroll_y);
        viewport.width = non_negative(viewport.width);
        viewport.height = non_negative(viewport.height);
        viewport.document_height = non_negative(viewport.document_height).max(viewport.height);
        Self {
            target: self.target.sanitized(),
            distance: non_negative(self.distance),
            arrow_size: non_negative(self.arrow_size),
            overlay: self.overlay.sanitized(),
            viewport,
            margins: Margins::new(non_negative(self.margins.left), non_negative(self.margins.right)),
            ..*self
        }
    }

    /// Offset added to viewport-relative coordinates for this mode.
    fn origin(&self) -> (f64, f64) {
        match self.mode {
            PositioningMode::Fixed => (0.0, 0.0),
            PositioningMode::Absolute => (self.viewport.scroll_x, self.viewport.scroll_y),
        }
    }

    fn bounds(&self) -> Bounds {
        let (ox, _) = self.origin();
        let bottom = match self.mode {
            PositioningMode::Fixed => self.viewport.height,
            PositioningMode::Absolute => self.viewport.document_height,
        };
        Bounds {
            left: ox + self.margins.left,
            right: ox + self.viewport.width - self.margins.right,
            top: 0.0,
            bottom,
        }
    }
}

/// Arrow position inside the callout's own frame (top-left of the arrow box).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrowOffset {
    pub top: f64,
    pub left: f64,
}

/// Final callout geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementResult {
    pub top: f64,
    pub left: f64,
    /// `None` for [`Side::Center`].
    pub arrow: Option<ArrowOffset>,
    /// Side actually used (after any autofix).
    pub side: Side,
    /// Side that was asked for.
    pub requested_side: Side,
    pub width: f64,
    pub height: f64,
    pub mode: PositioningMode,
}

impl PlacementResult {
    /// Whether the engine switched away from the requested side.
    #[inline]
    pub fn autofixed(&self) -> bool {
        self.side != self.requested_side
    }

    /// Callout box in the result's coordinate frame.
    #[inline]
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.left, self.top, self.width, self.height)
    }
}

/// Stateless placement solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionEngine;

impl PositionEngine {
    /// Place a callout.
    ///
    /// Never fails: degenerate inputs (empty anchor, callout larger than the
    /// viewport, non-finite numbers) are clipped to the nearest valid bound.
    pub fn place(request: &PlacementRequest) -> PlacementResult {
        let request = request.sanitized();
        let bounds = request.bounds();
        let (ox, oy) = request.origin();
        let target = request.target.translate(ox, oy);

        let requested = request.side;
        let mut candidate = Candidate::compute(requested, &request, target, bounds);
        if candidate.overflows
            && request.auto_fix
            && let Some(fallback) = requested.autofix()
        {
            tracing::debug!(
                target: "wayfinder.layout",
                requested = %requested,
                fallback = %fallback,
                "placement overflowed, autofixing side"
            );
            candidate = Candidate::compute(fallback, &request, target, bounds);
        }
        candidate.fit_within(bounds, request.arrow_size);

        PlacementResult {
            top: candidate.top,
            left: candidate.left,
            arrow: candidate.arrow,
            side: candidate.side,
            requested_side: requested,
            width: request.overlay.width,
            height: request.overlay.height,
            mode: request.mode,
        }
    }
}

/// Layout bounds in the result's coordinate frame.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Bounds {
    /// Clamp a start coordinate so `[start, start + extent]` stays in
    /// `[lo, hi]`; pins to `lo` when the extent does not fit at all.
    fn clamp_start(start: f64, extent: f64, lo: f64, hi: f64) -> f64 {
        let max = hi - extent;
        if max < lo { lo } else { start.clamp(lo, max) }
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    side: Side,
    top: f64,
    left: f64,
    width: f64,
    height: f64,
    arrow: Option<ArrowOffset>,
    overflows: bool,
}

impl Candidate {
    fn compute(side: Side, request: &PlacementRequest, target: BoundingBox, bounds: Bounds) -> Self {
        let Size { width, height } = request.overlay;
        let distance = request.distance;
        let arrow = request.arrow_size;

        let mut candidate = Self {
            side,
            top: 0.0,
            left: 0.0,
            width,
            height,
            arrow: None,
            overflows: false,
        };

        match side {
            Side::Bottom | Side::Top => {
                let raw_left = target.center_x() - width / 2.0;
                let left = Bounds::clamp_start(raw_left, width, bounds.left, bounds.right);
                candidate.left = left;
                let arrow_top = if side == Side::Bottom { -arrow } else { height };
                candidate.arrow = Some(ArrowOffset {
                    top: arrow_top,
                    left: width / 2.0 - arrow + (raw_left - left),
                });
                if side == Side::Bottom {
                    candidate.top = target.bottom() + distance;
                    candidate.overflows = candidate.top + height > bounds.bottom;
                } else {
                    candidate.top = target.top - distance - height;
                    candidate.overflows = candidate.top < bounds.top;
                }
            }
            Side::Right => {
                candidate.left = target.right() + distance;
                candidate.top = target.center_y() - height / 2.0;
                candidate.arrow = Some(ArrowOffset {
                    top: height / 2.0 - arrow,
                    left: -arrow,
                });
                candidate.overflows = candidate.left + width > bounds.right;
            }
            Side::Left => {
                candidate.left = target.left - distance - width;
                candidate.top = target.center_y() - height / 2.0;
                candidate.arrow = Some(ArrowOffset {
                    top: height / 2.0 - arrow,
                    left: width,
                });
                candidate.overflows = candidate.left < bounds.left;
            }
            Side::Center => {
                let (ox, oy) = request.origin();
                candidate.left = ox + request.viewport.width / 2.0 - width / 2.0;
                candidate.top = oy + request.viewport.height / 2.0 - height / 2.0;
            }
        }
        candidate
    }

    /// Clamp the callout into the bounds, dragging the arrow along the axis it
    /// slides on so it still points at the anchor.
    fn fit_within(&mut self, bounds: Bounds, arrow_size: f64) {
        let left = Bounds::clamp_start(self.left, self.width, bounds.left, bounds.right);
        let top = Bounds::clamp_start(self.top, self.height, bounds.top, bounds.bottom);
        let (dx, dy) = (self.left - left, self.top - top);
        self.left = left;
        self.top = top;

        let Some(arrow) = self.arrow.as_mut() else {
            return;
        };
        let span = arrow_size * 2.0;
        if self.side.is_vertical() {
            arrow.left = (arrow.left + dx).clamp(0.0, (self.width - span).max(0.0));
        } else {
            arrow.top = (arrow.top + dy).clamp(0.0, (self.height - span).max(0.0));
        }
    }
}

#[inline]
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[inline]
fn non_negative(value: f64) -> f64 {
    finite_or_zero(value).max(0.0)
}
