//! The tour state machine.
//!
//! ```text
//! Idle ──start──▶ Navigating ──settled──▶ AwaitingSettle ──timer──▶ Showing
//!                     ▲                                               │
//!                     └──────────────── next / prev ◀─────────────────┘
//!                      close (any running state) ──▶ Closed
//! ```
//!
//! The controller is single-threaded and never blocks. The two places a run
//! can wait are route navigation (the host calls
//! [`TourController::navigation_settled`] when a pending navigation lands)
//! and the settle delay (the host drives time through
//! [`TourController::advance_time`]). Every settle timer carries the run's
//! cancellation token, so [`TourController::close`] can always stop a show
//! that has not happened yet.
//!
//! A step whose anchor is not registered when its timer fires ends the whole
//! run. The controller logs the abort at WARN and closes; it does not retry.

use std::fmt;
use std::sync::mpsc;

use tracing::{debug, trace, warn};
use wayfinder_core::{
    Size, ViewportEvent, ViewportEventCoalescer, ViewportMetrics, ViewportSnapshot,
};
use wayfinder_layout::{PlacementRequest, PlacementResult, PositionEngine, PositioningMode};
use web_time::Duration;

use crate::cancellation::CancellationSource;
use crate::catalog::StepCatalog;
use crate::error::{Result, TourError};
use crate::host::{
    AnchorTarget, NavigationStatus, OverlayContent, OverlayHandle, OverlayRenderer, RouteNavigator,
};
use crate::options::TourOptions;
use crate::progress::{ActionType, ProgressReceiver, StepInfo};
use crate::registry::{Direction, Hook, RegisteredStep, StepHooks, StepRegistry};
use crate::timer::SettleTimers;

const TARGET: &str = "wayfinder.tour";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TourState {
    #[default]
    Idle,
    Navigating,
    AwaitingSettle,
    Showing,
    Closed,
}

impl TourState {
    #[must_use]
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::Navigating | Self::AwaitingSettle | Self::Showing)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Navigating => "navigating",
            Self::AwaitingSettle => "awaiting_settle",
            Self::Showing => "showing",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for TourState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingShow {
    direction: Direction,
    action: ActionType,
}

struct Run {
    id: u64,
    cancel: CancellationSource,
    progress: mpsc::Sender<StepInfo>,
}

struct Shown {
    handle: OverlayHandle,
    info: StepInfo,
    size: Size,
    placement: PlacementResult,
}

pub struct TourController {
    registry: StepRegistry,
    catalog: Box<dyn StepCatalog>,
    navigator: Box<dyn RouteNavigator>,
    renderer: Box<dyn OverlayRenderer>,
    viewport: ViewportMetrics,
    coalescer: ViewportEventCoalescer,
    options: TourOptions,
    state: TourState,
    timers: SettleTimers<PendingShow>,
    run: Option<Run>,
    runs: u64,
    awaiting_navigation: Option<PendingShow>,
    shown: Option<Shown>,
    last_shown: Option<StepInfo>,
}

impl TourController {
    pub fn new(
        catalog: impl StepCatalog + 'static,
        navigator: impl RouteNavigator + 'static,
        renderer: impl OverlayRenderer + 'static,
        viewport: ViewportSnapshot,
    ) -> Self {
        Self {
            registry: StepRegistry::new(),
            catalog: Box::new(catalog),
            navigator: Box::new(navigator),
            renderer: Box::new(renderer),
            viewport: ViewportMetrics::from_snapshot(viewport),
            coalescer: ViewportEventCoalescer::new(),
            options: TourOptions::default(),
            state: TourState::Idle,
            timers: SettleTimers::new(),
            run: None,
            runs: 0,
            awaiting_navigation: None,
            shown: None,
            last_shown: None,
        }
    }

    // ── Anchors ─────────────────────────────────────────────────────────

    /// Register the anchor for catalog step `name`.
    ///
    /// Registering a name that is already present replaces it. If that step
    /// is on screen its callout is re-placed against the new anchor.
    pub fn register_target(
        &mut self,
        name: &str,
        target: impl AnchorTarget + 'static,
        hooks: StepHooks,
    ) -> Result<()> {
        let def = self
            .catalog
            .get(name)
            .ok_or_else(|| TourError::UnknownStep {
                name: name.to_string(),
            })?;
        self.register_step(RegisteredStep::from_definition(def, target).hooks(hooks));
        Ok(())
    }

    /// Register a fully built step, bypassing the catalog.
    pub fn register_step(&mut self, step: RegisteredStep) {
        let name = step.name.clone();
        self.registry.register(step);
        if self.shown_name() == Some(name.as_str()) {
            trace!(target: TARGET, step = %name, "shown step re-registered");
            self.refresh_placement();
        }
    }

    /// Point an already registered step at a new anchor. Hooks and content
    /// are kept; a callout on screen for the step is re-placed.
    pub fn move_target(&mut self, name: &str, target: impl AnchorTarget + 'static) -> Result<()> {
        let Some(step) = self.registry.get_mut(name) else {
            return Err(TourError::MissingTarget {
                name: name.to_string(),
            });
        };
        step.set_target(target);
        if self.shown_name() == Some(name) {
            trace!(target: TARGET, step = %name, "shown step moved");
            self.refresh_placement();
        }
        Ok(())
    }

    /// Remove an anchor. A callout already on screen keeps its placement
    /// until the next transition.
    pub fn unregister_target(&mut self, name: &str) -> bool {
        self.registry.unregister(name).is_some()
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Begin a run. Returns the run's progress stream, or `None` if a run is
    /// already in progress.
    pub fn start(&mut self, options: TourOptions) -> Option<ProgressReceiver> {
        if self.state.is_in_progress() {
            trace!(target: TARGET, state = %self.state, "start ignored; tour already running");
            return None;
        }

        self.runs += 1;
        let _span = tracing::debug_span!(
            "tour.start",
            run = self.runs,
            steps = options.steps.len(),
        )
        .entered();

        self.registry.init(&options, &*self.catalog);
        self.options = options;
        let (progress, receiver) = mpsc::channel();
        self.run = Some(Run {
            id: self.runs,
            cancel: CancellationSource::new(),
            progress,
        });
        self.shown = None;
        self.last_shown = None;
        self.awaiting_navigation = None;
        self.viewport.start();

        debug!(
            target: TARGET,
            run = self.runs,
            cursor = self.registry.cursor(),
            "tour started"
        );
        self.begin_transition(PendingShow {
            direction: Direction::Next,
            action: ActionType::Start,
        });
        Some(receiver)
    }

    /// Report that a navigation returned as [`NavigationStatus::Pending`]
    /// has finished. Returns `false` if nothing was waiting on it.
    pub fn navigation_settled(&mut self) -> bool {
        if self.state != TourState::Navigating {
            return false;
        }
        match self.awaiting_navigation.take() {
            Some(pending) => {
                self.schedule_show(pending);
                true
            }
            None => false,
        }
    }

    /// Move the settle clock forward. Returns how many settle timers fired.
    pub fn advance_time(&mut self, delta: Duration) -> usize {
        let due = self.timers.advance(delta);
        let fired = due.len();
        for pending in due {
            if self.state == TourState::AwaitingSettle {
                self.show(pending);
            }
        }
        fired
    }

    pub fn next(&mut self) -> Result<()> {
        self.transition(Direction::Next, ActionType::Next)
    }

    /// Go back one step. Fails with [`TourError::NoPreviousStep`] on the
    /// first sequence position, leaving that step on screen.
    pub fn prev(&mut self) -> Result<()> {
        self.transition(Direction::Prev, ActionType::Prev)
    }

    /// End the run. Returns `false` if no run was in progress.
    pub fn close(&mut self) -> bool {
        if !self.state.is_in_progress() {
            return false;
        }

        let run = self.run.take();
        if let Some(run) = &run {
            run.cancel.cancel();
        }
        let dropped_timers = self.timers.cancel_all();
        self.awaiting_navigation = None;

        if let Some(shown) = self.shown.take() {
            self.renderer.unmount(shown.handle);
        }
        if let Some(info) = self.last_shown.take()
            && let Some(step) = self.registry.get_mut(&info.name)
        {
            step.hooks.fire(Hook::Done, &info);
        }

        self.navigator.scroll_to_origin();
        self.viewport.reset_scroll();
        self.viewport.stop();
        self.registry.reset();

        debug!(
            target: TARGET,
            run = run.as_ref().map_or(0, |r| r.id),
            from = %self.state,
            dropped_timers,
            "tour closed"
        );
        self.state = TourState::Closed;
        // Dropping the sender ends the progress stream.
        drop(run);
        true
    }

    // ── Viewport ────────────────────────────────────────────────────────

    /// Apply one scroll or resize signal and re-place the shown callout.
    /// Ignored while no run is in progress.
    pub fn handle_viewport_event(&mut self, event: ViewportEvent) {
        if self.viewport.apply(event) {
            self.refresh_placement();
        }
    }

    /// Collapse a burst of signals, apply what remains and re-place the
    /// shown callout at most once. Returns how many signals changed the
    /// metrics.
    pub fn handle_viewport_events<I>(&mut self, events: I) -> usize
    where
        I: IntoIterator<Item = ViewportEvent>,
    {
        for event in events {
            self.coalescer.push(event);
        }
        let absorbed = self.coalescer.absorbed();
        let mut changed = 0;
        for event in self.coalescer.flush() {
            if self.viewport.apply(event) {
                changed += 1;
            }
        }
        trace!(
            target: "wayfinder.viewport",
            absorbed,
            changed,
            "viewport burst applied"
        );
        if changed > 0 {
            self.refresh_placement();
        }
        changed
    }

    /// Replace the viewport metrics wholesale, e.g. with fresh measurements
    /// taken before a run starts.
    pub fn sync_viewport(&mut self, snapshot: ViewportSnapshot) {
        let listening = self.viewport.is_listening();
        self.viewport = ViewportMetrics::from_snapshot(snapshot);
        if listening {
            self.viewport.start();
        }
        self.refresh_placement();
    }

    // ── Introspection ───────────────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> TourState {
        self.state
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.state.is_in_progress()
    }

    /// The step currently on screen.
    #[must_use]
    pub fn current_step(&self) -> Option<&StepInfo> {
        self.shown.as_ref().map(|shown| &shown.info)
    }

    #[must_use]
    pub fn current_placement(&self) -> Option<&PlacementResult> {
        self.shown.as_ref().map(|shown| &shown.placement)
    }

    #[must_use]
    pub fn step_number(&self, name: &str) -> Option<usize> {
        self.registry.step_number(name)
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.registry.step_count()
    }

    #[must_use]
    pub fn is_first_step(&self) -> bool {
        self.registry.is_first()
    }

    #[must_use]
    pub fn is_last_step(&self) -> bool {
        self.registry.is_last()
    }

    /// Whether the callout should offer a "previous" control.
    #[must_use]
    pub fn show_prev_button(&self) -> bool {
        self.options.show_prev_button && !self.registry.is_first()
    }

    #[must_use]
    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    #[must_use]
    pub fn options(&self) -> &TourOptions {
        &self.options
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportMetrics {
        &self.viewport
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Settle timers that have fired over the controller's lifetime.
    #[must_use]
    pub fn timers_fired(&self) -> u64 {
        self.timers.fired_count()
    }

    /// Time until the next settle timer fires, if one is pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn shown_name(&self) -> Option<&str> {
        self.shown.as_ref().map(|shown| shown.info.name.as_str())
    }

    fn transition(&mut self, direction: Direction, action: ActionType) -> Result<()> {
        if self.state != TourState::Showing {
            return Err(TourError::InvalidTransition {
                action: action.as_str(),
                state: self.state,
            });
        }
        if direction == Direction::Prev && self.registry.is_first() {
            return Err(TourError::NoPreviousStep);
        }

        if let Some(shown) = self.shown.take() {
            self.renderer.unmount(shown.handle);
            let hook = match direction {
                Direction::Next => Hook::Next,
                Direction::Prev => Hook::Prev,
            };
            if let Some(step) = self.registry.get_mut(&shown.info.name) {
                step.hooks.fire(hook, &shown.info);
            }
        }
        self.begin_transition(PendingShow { direction, action });
        Ok(())
    }

    fn begin_transition(&mut self, pending: PendingShow) {
        self.state = TourState::Navigating;
        let route = self.registry.route_for(pending.direction).map(str::to_owned);
        let Some(route) = route else {
            // Nothing to navigate to; the show will find the end of the sequence.
            self.schedule_show(pending);
            return;
        };
        trace!(target: TARGET, route = %route, action = %pending.action, "navigating");
        match self.navigator.navigate(&route) {
            NavigationStatus::Settled => self.schedule_show(pending),
            NavigationStatus::Pending => self.awaiting_navigation = Some(pending),
        }
    }

    fn schedule_show(&mut self, pending: PendingShow) {
        let Some(run) = self.run.as_ref() else {
            return;
        };
        self.timers
            .schedule(self.options.settle_delay(), run.cancel.token(), pending);
        self.state = TourState::AwaitingSettle;
    }

    fn show(&mut self, pending: PendingShow) {
        let name = match self.registry.advance(pending.direction) {
            Ok(step) => step.name.clone(),
            Err(err) => {
                self.abort(&err);
                return;
            }
        };
        let Some(step) = self.registry.get(&name) else {
            return;
        };

        let span = tracing::debug_span!(
            "tour.show",
            step = %name,
            cursor = self.registry.cursor(),
            side = tracing::field::Empty,
        );
        let _entered = span.enter();

        let content = overlay_content(&self.registry, step, self.options.show_prev_button);
        let size = self.renderer.measure(&content);
        let placement = place_step(step, size, &self.viewport, &self.options);
        span.record("side", placement.side.as_str());
        let handle = self.renderer.mount(&content, &placement);

        let info = StepInfo {
            number: content.number,
            name: step.name.clone(),
            route: step.route.clone(),
            action_type: pending.action,
        };
        debug!(
            target: TARGET,
            step = %info.name,
            number = info.number,
            action = %info.action_type,
            top = placement.top,
            left = placement.left,
            autofixed = placement.autofixed(),
            "step shown"
        );

        self.shown = Some(Shown {
            handle,
            info: info.clone(),
            size,
            placement,
        });
        self.last_shown = Some(info.clone());
        self.state = TourState::Showing;

        if let Some(run) = &self.run
            && run.progress.send(info).is_err()
        {
            trace!(target: TARGET, run = run.id, "progress receiver dropped");
        }
    }

    fn abort(&mut self, err: &TourError) {
        match err {
            TourError::MissingTarget { name } => warn!(
                target: TARGET,
                step = %name,
                cursor = self.registry.cursor(),
                "no anchor registered for step; closing tour"
            ),
            other if other.aborts_tour() => {
                debug!(target: TARGET, reason = %other, "sequence finished; closing tour");
            }
            other => warn!(target: TARGET, reason = %other, "unexpected error while showing step; closing tour"),
        }
        self.close();
    }

    fn refresh_placement(&mut self) {
        if self.state != TourState::Showing {
            return;
        }
        let Some(shown) = self.shown.as_mut() else {
            return;
        };
        let Some(step) = self.registry.get(&shown.info.name) else {
            return;
        };
        let placement = place_step(step, shown.size, &self.viewport, &self.options);
        if placement != shown.placement {
            trace!(
                target: TARGET,
                step = %shown.info.name,
                top = placement.top,
                left = placement.left,
                "callout re-placed"
            );
            self.renderer.reposition(shown.handle, &placement);
            shown.placement = placement;
        }
    }
}

fn overlay_content<'a>(
    registry: &'a StepRegistry,
    step: &'a RegisteredStep,
    show_prev_option: bool,
) -> OverlayContent<'a> {
    OverlayContent {
        name: &step.name,
        title: &step.title,
        text: &step.text,
        number: registry.step_number(&step.name).unwrap_or(0),
        count: registry.step_count(),
        show_prev: show_prev_option && !registry.is_first(),
        is_last: registry.is_last(),
    }
}

fn place_step(
    step: &RegisteredStep,
    size: Size,
    viewport: &ViewportMetrics,
    options: &TourOptions,
) -> PlacementResult {
    let layout = &options.layout;
    let request = PlacementRequest::new(step.target_box(), size, viewport.snapshot())
        .side(step.side_or(options.default_side))
        .distance(layout.distance_from_target)
        .arrow_size(layout.arrow_size)
        .margins(layout.margins())
        .mode(PositioningMode::for_anchor(step.is_fixed_positioned()))
        .auto_fix(layout.auto_fix);
    PositionEngine::place(&request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{StaticCatalog, StepDefinition};
    use std::cell::RefCell;
    use std::rc::Rc;
    use wayfinder_core::BoundingBox;

    #[derive(Default)]
    struct Log {
        routes: Vec<String>,
        mounted: Vec<String>,
        unmounted: usize,
        next_handle: u64,
    }

    struct Nav(Rc<RefCell<Log>>);

    impl RouteNavigator for Nav {
        fn navigate(&mut self, route: &str) -> NavigationStatus {
            self.0.borrow_mut().routes.push(route.to_string());
            NavigationStatus::Settled
        }
    }

    struct Renderer(Rc<RefCell<Log>>);

    impl OverlayRenderer for Renderer {
        fn measure(&mut self, _content: &OverlayContent<'_>) -> Size {
            Size::new(200.0, 80.0)
        }

        fn mount(&mut self, content: &OverlayContent<'_>, _p: &PlacementResult) -> OverlayHandle {
            let mut log = self.0.borrow_mut();
            log.mounted.push(content.name.to_string());
            log.next_handle += 1;
            OverlayHandle(log.next_handle)
        }

        fn reposition(&mut self, _handle: OverlayHandle, _p: &PlacementResult) {}

        fn unmount(&mut self, _handle: OverlayHandle) {
            self.0.borrow_mut().unmounted += 1;
        }
    }

    fn controller() -> (TourController, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let catalog = StaticCatalog::from_definitions([
            StepDefinition::new("a", "/a", "A"),
            StepDefinition::new("b", "/b", "B"),
        ]);
        let mut tour = TourController::new(
            catalog,
            Nav(Rc::clone(&log)),
            Renderer(Rc::clone(&log)),
            ViewportSnapshot::new(1024.0, 768.0, 2000.0),
        );
        for name in ["a", "b"] {
            tour.register_target(name, BoundingBox::new(100.0, 100.0, 50.0, 20.0), StepHooks::new())
                .expect("known step");
        }
        (tour, log)
    }

    #[test]
    fn state_names() {
        assert_eq!(TourState::AwaitingSettle.to_string(), "awaiting_settle");
        assert!(TourState::Showing.is_in_progress());
        assert!(!TourState::Closed.is_in_progress());
        assert!(!TourState::Idle.is_in_progress());
    }

    #[test]
    fn start_navigates_then_waits_for_the_timer() {
        let (mut tour, log) = controller();
        let rx = tour.start(TourOptions::new(["a", "b"])).expect("started");
        assert_eq!(tour.state(), TourState::AwaitingSettle);
        assert_eq!(log.borrow().routes, vec!["/a"]);
        assert!(log.borrow().mounted.is_empty());

        assert_eq!(tour.advance_time(Duration::from_millis(1)), 1);
        assert_eq!(tour.state(), TourState::Showing);
        assert_eq!(log.borrow().mounted, vec!["a"]);
        let info = rx.try_recv().expect("step info");
        assert_eq!(info.number, 1);
        assert_eq!(info.action_type, ActionType::Start);
    }

    #[test]
    fn second_start_is_ignored() {
        let (mut tour, _log) = controller();
        assert!(tour.start(TourOptions::new(["a"])).is_some());
        assert!(tour.start(TourOptions::new(["b"])).is_none());
        assert_eq!(tour.step_count(), 1);
    }

    #[test]
    fn next_outside_showing_is_rejected() {
        let (mut tour, _log) = controller();
        let err = tour.next().unwrap_err();
        assert!(matches!(
            err,
            TourError::InvalidTransition { action: "next", state: TourState::Idle }
        ));
        tour.start(TourOptions::new(["a"]));
        assert!(tour.prev().is_err());
        assert_eq!(tour.state(), TourState::AwaitingSettle);
    }

    #[test]
    fn register_target_requires_catalog_entry() {
        let (mut tour, _log) = controller();
        let err = tour
            .register_target("zzz", BoundingBox::default(), StepHooks::new())
            .unwrap_err();
        assert!(matches!(err, TourError::UnknownStep { ref name } if name == "zzz"));
    }

    #[test]
    fn close_when_idle_is_a_no_op() {
        let (mut tour, log) = controller();
        assert!(!tour.close());
        assert_eq!(tour.state(), TourState::Idle);
        assert_eq!(log.borrow().unmounted, 0);
    }

    #[test]
    fn restart_after_close() {
        let (mut tour, log) = controller();
        tour.start(TourOptions::new(["a"]));
        tour.advance_time(Duration::from_millis(1));
        assert!(tour.close());
        assert_eq!(tour.state(), TourState::Closed);

        let rx = tour.start(TourOptions::new(["b"])).expect("restart");
        tour.advance_time(Duration::from_millis(1));
        assert_eq!(rx.try_recv().map(|i| i.name).ok(), Some("b".to_string()));
        assert_eq!(log.borrow().mounted, vec!["a", "b"]);
    }
}
