//! Live anchors and the ordered tour sequence.
//!
//! Views register an anchor for a step name when they mount and unregister
//! it when they go away. Independently, [`StepRegistry::init`] lays out the
//! ordered sequence for one tour run and parks the cursor just before the
//! configured first step. [`StepRegistry::advance`] then walks the cursor and
//! pairs the id it lands on with whatever anchor is registered under it.
//!
//! # Invariants
//!
//! 1. At most one [`RegisteredStep`] per name. Registering a name again
//!    replaces the earlier entry.
//! 2. `-1 <= cursor <= len`. Positions outside `0..len` mean no step is
//!    current.
//! 3. The sequence is fixed between two calls to `init`; only the cursor
//!    moves.
//!
//! # Example
//!
//! ```
//! use wayfinder_core::BoundingBox;
//! use wayfinder_runtime::{Direction, RegisteredStep, StaticCatalog, StepDefinition, StepRegistry, TourOptions};
//!
//! let catalog = StaticCatalog::from_definitions([
//!     StepDefinition::new("a", "/a", "A"),
//!     StepDefinition::new("b", "/b", "B"),
//! ]);
//! let mut registry = StepRegistry::new();
//! registry.register(RegisteredStep::new("b", "/b", BoundingBox::new(0.0, 0.0, 10.0, 10.0)));
//!
//! registry.init(&TourOptions::new(["a", "b"]).first_step("b"), &catalog);
//! assert_eq!(registry.route_for(Direction::Next), Some("/b"));
//! assert_eq!(registry.advance(Direction::Next).unwrap().name, "b");
//! assert_eq!(registry.step_number("b"), Some(2));
//! ```

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};
use wayfinder_core::BoundingBox;
use wayfinder_layout::Side;

use crate::catalog::{StepCatalog, StepDefinition};
use crate::error::{Result, TourError};
use crate::host::AnchorTarget;
use crate::options::TourOptions;
use crate::progress::StepInfo;

const TARGET: &str = "wayfinder.registry";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    #[must_use]
    pub const fn delta(self) -> isize {
        match self {
            Self::Next => 1,
            Self::Prev => -1,
        }
    }
}

/// Callback fired by the controller around step transitions.
pub type StepCallback = Box<dyn FnMut(&StepInfo)>;

/// Host hooks attached to a registered step.
#[derive(Default)]
pub struct StepHooks {
    pub on_next: Option<StepCallback>,
    pub on_prev: Option<StepCallback>,
    pub on_done: Option<StepCallback>,
}

impl StepHooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_next(mut self, f: impl FnMut(&StepInfo) + 'static) -> Self {
        self.on_next = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_prev(mut self, f: impl FnMut(&StepInfo) + 'static) -> Self {
        self.on_prev = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_done(mut self, f: impl FnMut(&StepInfo) + 'static) -> Self {
        self.on_done = Some(Box::new(f));
        self
    }

    pub(crate) fn fire(&mut self, hook: Hook, info: &StepInfo) {
        let slot = match hook {
            Hook::Next => &mut self.on_next,
            Hook::Prev => &mut self.on_prev,
            Hook::Done => &mut self.on_done,
        };
        if let Some(f) = slot.as_mut() {
            f(info);
        }
    }
}

impl fmt::Debug for StepHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepHooks")
            .field("on_next", &self.on_next.is_some())
            .field("on_prev", &self.on_prev.is_some())
            .field("on_done", &self.on_done.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Hook {
    Next,
    Prev,
    Done,
}

/// A step whose anchor is currently mounted.
pub struct RegisteredStep {
    pub name: String,
    pub route: String,
    pub title: String,
    pub text: String,
    /// `None` defers to the run's default side.
    pub side: Option<Side>,
    pub hooks: StepHooks,
    /// Forces fixed positioning even if the anchor does not report it.
    pub is_fixed: bool,
    target: Box<dyn AnchorTarget>,
}

impl RegisteredStep {
    pub fn new(
        name: impl Into<String>,
        route: impl Into<String>,
        target: impl AnchorTarget + 'static,
    ) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            route: route.into(),
            text: String::new(),
            side: None,
            hooks: StepHooks::default(),
            is_fixed: false,
            target: Box::new(target),
        }
    }

    /// Build a step from its catalog entry.
    pub fn from_definition(def: StepDefinition, target: impl AnchorTarget + 'static) -> Self {
        Self {
            name: def.id,
            route: def.route,
            title: def.title,
            text: def.text,
            side: def.side,
            hooks: StepHooks::default(),
            is_fixed: false,
            target: Box::new(target),
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    #[must_use]
    pub fn hooks(mut self, hooks: StepHooks) -> Self {
        self.hooks = hooks;
        self
    }

    #[must_use]
    pub fn fixed(mut self, fixed: bool) -> Self {
        self.is_fixed = fixed;
        self
    }

    /// Swap the anchor, keeping content and hooks.
    pub fn set_target(&mut self, target: impl AnchorTarget + 'static) {
        self.target = Box::new(target);
    }

    #[must_use]
    pub fn target_box(&self) -> BoundingBox {
        self.target.bounding_box()
    }

    #[must_use]
    pub fn is_fixed_positioned(&self) -> bool {
        self.is_fixed || self.target.is_fixed_positioned()
    }

    #[must_use]
    pub fn side_or(&self, default: Side) -> Side {
        self.side.unwrap_or(default)
    }
}

impl fmt::Debug for RegisteredStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredStep")
            .field("name", &self.name)
            .field("route", &self.route)
            .field("side", &self.side)
            .field("is_fixed", &self.is_fixed)
            .field("target", &self.target.bounding_box())
            .field("hooks", &self.hooks)
            .finish()
    }
}

/// One position in the tour sequence. `route` comes from the catalog and is
/// `None` for ids the catalog does not know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceEntry {
    pub id: String,
    pub route: Option<String>,
}

#[derive(Debug)]
pub struct StepRegistry {
    steps: HashMap<String, RegisteredStep>,
    sequence: Vec<SequenceEntry>,
    cursor: isize,
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StepRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: HashMap::new(),
            sequence: Vec::new(),
            cursor: -1,
        }
    }

    /// Insert or replace the step registered under `step.name`.
    /// Returns the replaced step, if any.
    pub fn register(&mut self, step: RegisteredStep) -> Option<RegisteredStep> {
        let name = step.name.clone();
        let previous = self.steps.insert(name.clone(), step);
        trace!(
            target: TARGET,
            step = %name,
            replaced = previous.is_some(),
            "step registered"
        );
        previous
    }

    pub fn unregister(&mut self, name: &str) -> Option<RegisteredStep> {
        let removed = self.steps.remove(name);
        if removed.is_some() {
            trace!(target: TARGET, step = %name, "step unregistered");
        }
        removed
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegisteredStep> {
        self.steps.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RegisteredStep> {
        self.steps.get_mut(name)
    }

    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.steps.contains_key(name)
    }

    #[must_use]
    pub fn registered_len(&self) -> usize {
        self.steps.len()
    }

    /// Lay out the sequence for a new run and park the cursor one position
    /// before the first step.
    pub fn init(&mut self, options: &TourOptions, catalog: &dyn StepCatalog) {
        self.sequence = options
            .steps
            .iter()
            .map(|id| SequenceEntry {
                id: id.clone(),
                route: catalog.get(id).map(|def| def.route),
            })
            .collect();

        let first = options.first_step_index();
        if first.is_none()
            && let Some(requested) = options.first_step.as_deref()
        {
            debug!(
                target: TARGET,
                first_step = %requested,
                "first step not in sequence; starting at the beginning"
            );
        }
        self.cursor = first.map_or(-1, |index| index as isize - 1);
        debug!(
            target: TARGET,
            len = self.sequence.len(),
            cursor = self.cursor,
            "sequence initialised"
        );
    }

    /// Drop the sequence and park the cursor. Registered anchors are kept.
    pub fn reset(&mut self) {
        self.sequence.clear();
        self.cursor = -1;
    }

    /// Move the cursor one position and return the anchor registered for
    /// the id it lands on.
    ///
    /// The cursor moves even when this fails, so the caller observes the
    /// position it failed at.
    pub fn advance(&mut self, direction: Direction) -> Result<&mut RegisteredStep> {
        let len = self.sequence.len();
        self.cursor = (self.cursor + direction.delta()).clamp(-1, len as isize);
        let cursor = self.cursor;
        let entry = usize::try_from(cursor)
            .ok()
            .and_then(|index| self.sequence.get(index))
            .ok_or(TourError::SequenceExhausted { cursor, len })?;
        let name = entry.id.as_str();
        self.steps
            .get_mut(name)
            .ok_or_else(|| TourError::MissingTarget {
                name: name.to_string(),
            })
    }

    /// The sequence entry one position away from the cursor, if any.
    #[must_use]
    pub fn peek(&self, direction: Direction) -> Option<&SequenceEntry> {
        let index = usize::try_from(self.cursor + direction.delta()).ok()?;
        self.sequence.get(index)
    }

    /// Route of the adjacent sequence entry. Falls back to the route of a
    /// registered anchor when the catalog does not know the id.
    #[must_use]
    pub fn route_for(&self, direction: Direction) -> Option<&str> {
        let entry = self.peek(direction)?;
        entry
            .route
            .as_deref()
            .or_else(|| self.steps.get(&entry.id).map(|step| step.route.as_str()))
    }

    #[must_use]
    pub fn cursor(&self) -> isize {
        self.cursor
    }

    #[must_use]
    pub fn current_id(&self) -> Option<&str> {
        let index = usize::try_from(self.cursor).ok()?;
        self.sequence.get(index).map(|entry| entry.id.as_str())
    }

    #[must_use]
    pub fn current(&self) -> Option<&RegisteredStep> {
        self.current_id().and_then(|id| self.steps.get(id))
    }

    /// 1-based position of `name` in the sequence.
    #[must_use]
    pub fn step_number(&self, name: &str) -> Option<usize> {
        self.sequence
            .iter()
            .position(|entry| entry.id == name)
            .map(|index| index + 1)
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn sequence(&self) -> &[SequenceEntry] {
        &self.sequence
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        !self.sequence.is_empty() && self.cursor == self.sequence.len() as isize - 1
    }
}
