#![forbid(unsafe_code)]

//! Coalescing for bursts of viewport events.
//!
//! Browsers fire `scroll` and `resize` at frame rate while the user drags or
//! flings. Re-placing an overlay for every intermediate value is wasted work,
//! so [`ViewportEventCoalescer`] keeps only the latest value of each kind:
//!
//! - Scroll: latest offsets win
//! - Resize: latest dimensions win
//! - Document resize: latest height wins
//!
//! Since every event carries absolute values, dropping intermediates never
//! changes the final metrics.
//!
//! # Usage
//!
//! ```
//! use wayfinder_core::event::ViewportEvent;
//! use wayfinder_core::event_coalescer::ViewportEventCoalescer;
//!
//! let mut coalescer = ViewportEventCoalescer::new();
//! coalescer.push(ViewportEvent::Scroll { x: 0.0, y: 10.0 });
//! coalescer.push(ViewportEvent::Scroll { x: 0.0, y: 25.0 });
//!
//! let pending = coalescer.flush();
//! assert_eq!(pending, vec![ViewportEvent::Scroll { x: 0.0, y: 25.0 }]);
//! ```

use crate::event::ViewportEvent;

/// Collapses high-frequency viewport events, latest value wins.
///
/// Not thread-safe; use from the single event-processing thread.
#[derive(Debug, Clone, Default)]
pub struct ViewportEventCoalescer {
    pending_resize: Option<ViewportEvent>,
    pending_document: Option<ViewportEvent>,
    pending_scroll: Option<ViewportEvent>,
    /// Number of events absorbed since the last flush.
    absorbed: u32,
}

impl ViewportEventCoalescer {
    /// Create an empty coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event, replacing any pending event of the same kind.
    pub fn push(&mut self, event: ViewportEvent) {
        let slot = match event {
            ViewportEvent::Scroll { .. } => &mut self.pending_scroll,
            ViewportEvent::Resize { .. } => &mut self.pending_resize,
            ViewportEvent::DocumentResize { .. } => &mut self.pending_document,
        };
        if slot.replace(event).is_some() {
            self.absorbed = self.absorbed.saturating_add(1);
        }
    }

    /// Whether any event is pending.
    #[inline]
    pub fn has_pending(&self) -> bool {
        self.pending_scroll.is_some()
            || self.pending_resize.is_some()
            || self.pending_document.is_some()
    }

    /// Number of events dropped in favour of a later one since the last flush.
    #[inline]
    pub fn absorbed(&self) -> u32 {
        self.absorbed
    }

    /// Drain pending events.
    ///
    /// Order is resize, document resize, then scroll: scroll clamping depends
    /// on the dimensions, so dimensions are applied first.
    #[must_use]
    pub fn flush(&mut self) -> Vec<ViewportEvent> {
        self.absorbed = 0;
        [
            self.pending_resize.take(),
            self.pending_document.take(),
            self.pending_scroll.take(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
