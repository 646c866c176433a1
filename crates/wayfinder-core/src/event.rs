#![forbid(unsafe_code)]

//! Viewport signals consumed from the host environment.

use serde::{Deserialize, Serialize};

/// A window-level signal that can invalidate an overlay placement.
///
/// Scroll offsets are absolute (the new `scrollX`/`scrollY`), not deltas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ViewportEvent {
    /// The document scrolled to the given offsets.
    Scroll { x: f64, y: f64 },
    /// The viewport was resized.
    Resize { width: f64, height: f64 },
    /// The document's scrollable height changed (content mounted/unmounted).
    DocumentResize { height: f64 },
}

impl ViewportEvent {
    /// Whether this is a scroll signal.
    #[inline]
    pub const fn is_scroll(&self) -> bool {
        matches!(self, Self::Scroll { .. })
    }

    /// Short label used in log fields.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Scroll { .. } => "scroll",
            Self::Resize { .. } => "resize",
            Self::DocumentResize { .. } => "document_resize",
        }
    }
}
