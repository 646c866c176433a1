#![forbid(unsafe_code)]

//! Placement solver for tour callouts.
//!
//! `wayfinder-layout` is pure geometry: given an anchor box, the callout's
//! measured size and the current viewport, it decides which side the callout
//! goes on and where. See [`placement`] for the algorithm.

pub mod placement;

pub use placement::{
    ArrowOffset, PlacementRequest, PlacementResult, PositionEngine, PositioningMode, Side,
};
pub use wayfinder_core::{BoundingBox, Margins, Size, ViewportSnapshot};
