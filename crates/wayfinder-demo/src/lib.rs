#![forbid(unsafe_code)]

//! Headless driver for Wayfinder tours.
//!
//! Loads a step catalog, tour options and a simulated page, then runs a
//! scripted tour through [`wayfinder::TourController`] with text stand-ins
//! for the router and the callout renderer.

pub mod cli;
pub mod error;
pub mod host;
pub mod logging;
pub mod runner;
pub mod scene;
pub mod script;

pub use cli::{run, run_from_env};
pub use error::{DemoError, Result};
