#![forbid(unsafe_code)]

//! Runtime: step registry, tour options and the tour controller.
//!
//! # Role in Wayfinder
//! `wayfinder-runtime` runs a guided tour. The host registers anchors as its
//! views mount, starts a run with [`TourOptions`], forwards viewport signals
//! and drives the settle clock. The [`TourController`] navigates, waits,
//! places each callout with the layout solver and reports progress as a
//! stream of [`StepInfo`].
//!
//! # Host seams
//! The controller only talks to the host through traits: [`StepCatalog`]
//! for step content, [`AnchorTarget`] for live anchor geometry,
//! [`RouteNavigator`] for routing and [`OverlayRenderer`] for drawing.

pub mod cancellation;
pub mod catalog;
pub mod controller;
pub mod error;
pub mod host;
pub mod options;
pub mod progress;
pub mod registry;
pub mod timer;

pub use cancellation::{CancellationSource, CancellationToken};
pub use catalog::{StaticCatalog, StepCatalog, StepDefinition};
pub use controller::{TourController, TourState};
pub use error::{ConfigError, Result, TourError};
pub use host::{
    AnchorTarget, NavigationStatus, OverlayContent, OverlayHandle, OverlayRenderer, RouteNavigator,
};
pub use options::{LayoutOptions, TourOptions};
pub use progress::{ActionType, ProgressReceiver, StepInfo};
pub use registry::{Direction, RegisteredStep, SequenceEntry, StepCallback, StepHooks, StepRegistry};
pub use timer::SettleTimers;
