//! Per-run tour configuration.
//!
//! [`TourOptions`] is the record passed to
//! [`TourController::start`](crate::TourController::start). Every field has a
//! default, so a TOML or JSON document only needs to name what it changes:
//!
//! ```toml
//! steps = ["cluster-list", "node-table", "events"]
//! first_step = "node-table"
//! default_side = "right"
//! waiting_time_ms = 250
//!
//! [layout]
//! distance_from_target = 20.0
//! ```
//!
//! Loaders parse only. Call [`TourOptions::validate`] (or
//! [`TourOptions::validated`]) to check the result.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use wayfinder_layout::{Margins, Side};
use web_time::Duration;

use crate::error::ConfigError;

/// Spacing and clamping knobs handed to the placement solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Gap between the anchor and the callout edge.
    pub distance_from_target: f64,
    /// Half-width of the pointer arrow.
    pub arrow_size: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    /// Allow one hop to the next side when the requested side overflows.
    pub auto_fix: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            distance_from_target: 15.0,
            arrow_size: 10.0,
            margin_left: 0.0,
            margin_right: 0.0,
            auto_fix: true,
        }
    }
}

impl LayoutOptions {
    #[must_use]
    pub fn margins(&self) -> Margins {
        Margins::new(self.margin_left, self.margin_right)
    }

    fn validate_into(&self, errors: &mut Vec<String>) {
        let fields = [
            ("distance_from_target", self.distance_from_target),
            ("arrow_size", self.arrow_size),
            ("margin_left", self.margin_left),
            ("margin_right", self.margin_right),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                errors.push(format!("layout.{name} must be finite, got {value}"));
            } else if value < 0.0 {
                errors.push(format!("layout.{name} must be >= 0, got {value}"));
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourOptions {
    /// Ordered step ids. Each id should exist in the step catalog.
    pub steps: Vec<String>,
    /// Step to open on. Unknown ids fall back to the first step.
    pub first_step: Option<String>,
    /// Side used for steps whose catalog entry names none.
    pub default_side: Side,
    /// Delay between a settled navigation and the callout being shown.
    pub waiting_time_ms: u64,
    pub show_prev_button: bool,
    pub layout: LayoutOptions,
}

impl Default for TourOptions {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            first_step: None,
            default_side: Side::Bottom,
            waiting_time_ms: 1,
            show_prev_button: true,
            layout: LayoutOptions::default(),
        }
    }
}

impl TourOptions {
    pub fn new<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            steps: steps.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn first_step(mut self, id: impl Into<String>) -> Self {
        self.first_step = Some(id.into());
        self
    }

    #[must_use]
    pub fn default_side(mut self, side: Side) -> Self {
        self.default_side = side;
        self
    }

    /// Set the settle delay. Sub-millisecond precision is dropped.
    #[must_use]
    pub fn waiting_time(mut self, delay: Duration) -> Self {
        self.waiting_time_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn show_prev_button(mut self, show: bool) -> Self {
        self.show_prev_button = show;
        self
    }

    #[must_use]
    pub fn layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.waiting_time_ms)
    }

    /// Index of `first_step` in `steps`, if it is set and present.
    #[must_use]
    pub fn first_step_index(&self) -> Option<usize> {
        let first = self.first_step.as_deref()?;
        self.steps.iter().position(|id| id == first)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check the options for problems. Returns one message per problem;
    /// an empty vector means the options are usable.
    ///
    /// A `first_step` that is not in `steps` is not an error: the tour
    /// opens on the first step instead.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.steps.is_empty() {
            errors.push("steps must name at least one step".to_string());
        }

        let mut seen = HashSet::new();
        for id in &self.steps {
            if id.trim().is_empty() {
                errors.push("steps contains an empty id".to_string());
            } else if !seen.insert(id.as_str()) {
                errors.push(format!("step `{id}` appears more than once"));
            }
        }

        self.layout.validate_into(&mut errors);
        errors
    }

    /// Consume the options, returning them only if [`validate`](Self::validate)
    /// reports nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}
