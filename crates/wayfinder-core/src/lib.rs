#![forbid(unsafe_code)]

//! Core: geometry primitives, viewport events, and viewport metrics.
//!
//! # Role in Wayfinder
//! `wayfinder-core` is the input layer. It owns the pixel geometry types that
//! describe anchor elements and overlays, the normalized viewport signals the
//! host forwards (scroll, resize), and the [`ViewportMetrics`] service that
//! turns those signals into current scroll offsets and visible bounds.
//!
//! # How it fits in the system
//! The position engine (`wayfinder-layout`) consumes these types as pure
//! inputs. The runtime (`wayfinder-runtime`) owns a `ViewportMetrics`
//! instance whose lifecycle is tied to a tour run.
//!
//! [`ViewportMetrics`]: viewport::ViewportMetrics

pub mod event;
pub mod event_coalescer;
pub mod geometry;
pub mod viewport;

pub use event::ViewportEvent;
pub use event_coalescer::ViewportEventCoalescer;
pub use geometry::{BoundingBox, Margins, Size};
pub use viewport::{ViewportMetrics, ViewportSnapshot};
