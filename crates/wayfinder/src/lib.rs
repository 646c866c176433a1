#![forbid(unsafe_code)]

//! Wayfinder public facade crate.
//!
//! Re-exports the geometry, placement and tour types from the internal
//! crates, plus a [`prelude`] for hosts wiring a tour into their app.

// --- Core re-exports -------------------------------------------------------

pub use wayfinder_core::{
    BoundingBox, Margins, Size, ViewportEvent, ViewportEventCoalescer, ViewportMetrics,
    ViewportSnapshot,
};

// --- Layout re-exports -----------------------------------------------------

pub use wayfinder_layout::{
    ArrowOffset, PlacementRequest, PlacementResult, PositionEngine, PositioningMode, Side,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use wayfinder_runtime::{
    ActionType, AnchorTarget, ConfigError, LayoutOptions, NavigationStatus, OverlayContent,
    OverlayHandle, OverlayRenderer, ProgressReceiver, RegisteredStep, RouteNavigator,
    StaticCatalog, StepCatalog, StepDefinition, StepHooks, StepInfo, TourController, TourError,
    TourOptions, TourState,
};

/// Everyday imports for hosts.
pub mod prelude {
    pub use crate::{BoundingBox, PlacementResult, Side, Size, ViewportEvent, ViewportSnapshot};

    #[cfg(feature = "runtime")]
    pub use crate::{
        AnchorTarget, NavigationStatus, OverlayContent, OverlayHandle, OverlayRenderer,
        RouteNavigator, StaticCatalog, StepDefinition, StepHooks, StepInfo, TourController,
        TourOptions, TourState,
    };

    pub use crate::core;
    pub use crate::layout;
    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use wayfinder_core as core;
pub use wayfinder_layout as layout;
#[cfg(feature = "runtime")]
pub use wayfinder_runtime as runtime;
