#![forbid(unsafe_code)]

//! Viewport metrics service.
//!
//! [`ViewportMetrics`] tracks the host window's scroll offsets and dimensions
//! and derives the visible vertical band of the document. It is an explicit,
//! injectable service: it only reacts to events between [`start`] and
//! [`stop`], so a tour that has ended leaves no listener behind.
//!
//! # Invariants
//!
//! 1. While stopped, [`apply`] never mutates the metrics.
//! 2. `visible_bottom() - visible_top() == height()` at all times.
//! 3. `document_height() >= height()`: a document is never shorter than the
//!    window showing it.
//!
//! [`start`]: ViewportMetrics::start
//! [`stop`]: ViewportMetrics::stop
//! [`apply`]: ViewportMetrics::apply

use serde::{Deserialize, Serialize};

use crate::event::ViewportEvent;
use crate::geometry::finite_or_zero;

/// Point-in-time copy of the viewport state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportSnapshot {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
    pub document_height: f64,
}

impl ViewportSnapshot {
    /// Create a snapshot at scroll origin.
    pub const fn new(width: f64, height: f64, document_height: f64) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width,
            height,
            document_height,
        }
    }

    /// Set scroll offsets.
    #[must_use]
    pub const fn with_scroll(mut self, x: f64, y: f64) -> Self {
        self.scroll_x = x;
        self.scroll_y = y;
        self
    }
}

/// Scroll/resize listener with an explicit start/stop lifecycle.
#[derive(Debug, Clone, Default)]
pub struct ViewportMetrics {
    snapshot: ViewportSnapshot,
    listening: bool,
    events_applied: u64,
}

impl ViewportMetrics {
    /// Create a stopped service with the given initial window size.
    #[must_use]
    pub fn new(width: f64, height: f64, document_height: f64) -> Self {
        Self {
            snapshot: ViewportSnapshot::new(
                finite_or_zero(width).max(0.0),
                finite_or_zero(height).max(0.0),
                finite_or_zero(document_height).max(0.0),
            ),
            listening: false,
            events_applied: 0,
        }
    }

    /// Create a stopped service from a full snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: ViewportSnapshot) -> Self {
        let mut metrics = Self::new(snapshot.width, snapshot.height, snapshot.document_height);
        metrics.snapshot.scroll_x = finite_or_zero(snapshot.scroll_x);
        metrics.snapshot.scroll_y = finite_or_zero(snapshot.scroll_y);
        metrics
    }

    /// Begin reacting to viewport events.
    pub fn start(&mut self) {
        if !self.listening {
            tracing::trace!(target: "wayfinder.viewport", "viewport listener started");
        }
        self.listening = true;
    }

    /// Stop reacting to viewport events.
    pub fn stop(&mut self) {
        if self.listening {
            tracing::trace!(
                target: "wayfinder.viewport",
                events_applied = self.events_applied,
                "viewport listener stopped"
            );
        }
        self.listening = false;
    }

    /// Whether the service is currently listening.
    #[inline]
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Apply a host event.
    ///
    /// Returns `true` if the metrics changed. Always `false` while stopped.
    pub fn apply(&mut self, event: ViewportEvent) -> bool {
        if !self.listening {
            return false;
        }
        let before = self.snapshot;
        match event {
            ViewportEvent::Scroll { x, y } => {
                self.snapshot.scroll_x = finite_or_zero(x);
                self.snapshot.scroll_y = finite_or_zero(y);
            }
            ViewportEvent::Resize { width, height } => {
                self.snapshot.width = finite_or_zero(width).max(0.0);
                self.snapshot.height = finite_or_zero(height).max(0.0);
            }
            ViewportEvent::DocumentResize { height } => {
                self.snapshot.document_height = finite_or_zero(height).max(0.0);
            }
        }
        self.events_applied = self.events_applied.saturating_add(1);
        before != self.snapshot
    }

    /// Reset scroll offsets to the document origin.
    ///
    /// Applies regardless of the listening state: it mirrors a scroll the
    /// host performs on our behalf.
    pub fn reset_scroll(&mut self) {
        self.snapshot.scroll_x = 0.0;
        self.snapshot.scroll_y = 0.0;
    }

    /// Current state.
    #[inline]
    pub fn snapshot(&self) -> ViewportSnapshot {
        ViewportSnapshot {
            document_height: self.document_height(),
            ..self.snapshot
        }
    }

    /// Horizontal scroll offset.
    #[inline]
    pub fn scroll_x(&self) -> f64 {
        self.snapshot.scroll_x
    }

    /// Vertical scroll offset.
    #[inline]
    pub fn scroll_y(&self) -> f64 {
        self.snapshot.scroll_y
    }

    /// Viewport width.
    #[inline]
    pub fn width(&self) -> f64 {
        self.snapshot.width
    }

    /// Viewport height.
    #[inline]
    pub fn height(&self) -> f64 {
        self.snapshot.height
    }

    /// Scrollable document height (never less than the viewport height).
    #[inline]
    pub fn document_height(&self) -> f64 {
        self.snapshot.document_height.max(self.snapshot.height)
    }

    /// Document-relative y of the first visible row.
    #[inline]
    pub fn visible_top(&self) -> f64 {
        self.snapshot.scroll_y
    }

    /// Document-relative y just past the last visible row.
    #[inline]
    pub fn visible_bottom(&self) -> f64 {
        self.snapshot.scroll_y + self.snapshot.height
    }

    /// Number of events applied while listening.
    #[inline]
    pub fn events_applied(&self) -> u64 {
        self.events_applied
    }
}
