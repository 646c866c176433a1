//! Drive one scripted tour run to completion.

use std::rc::Rc;

use tracing::{debug, info};
use wayfinder::{
    NavigationStatus, ProgressReceiver, RegisteredStep, StaticCatalog, StepCatalog, TourController,
    TourOptions,
};
use web_time::Duration;

use crate::error::{DemoError, Result};
use crate::host::{DemoNavigator, Entry, TextRenderer, Transcript};
use crate::scene::Scene;
use crate::script::ScriptAction;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunSettings {
    /// Navigation reports `Pending`; the runner settles it before each pump.
    pub async_navigation: bool,
}

pub struct Runner {
    tour: TourController,
    transcript: Transcript,
    progress: Option<ProgressReceiver>,
    settings: RunSettings,
    scene: Scene,
}

impl Runner {
    pub fn new(catalog: StaticCatalog, scene: Scene, settings: RunSettings) -> Result<Self> {
        let transcript = Transcript::default();
        let status = if settings.async_navigation {
            NavigationStatus::Pending
        } else {
            NavigationStatus::Settled
        };
        let anchors: Vec<_> = scene
            .anchors
            .iter()
            .map(|anchor| (anchor.clone(), catalog.get(&anchor.step)))
            .collect();
        let mut tour = TourController::new(
            catalog,
            DemoNavigator::new(Rc::clone(&transcript), status),
            TextRenderer::new(Rc::clone(&transcript)),
            scene.viewport.snapshot(),
        );
        for (anchor, definition) in anchors {
            let Some(definition) = definition else {
                return Err(wayfinder::TourError::UnknownStep { name: anchor.step }.into());
            };
            tour.register_step(
                RegisteredStep::from_definition(definition, anchor.bounding_box())
                    .fixed(anchor.fixed),
            );
        }
        Ok(Self {
            tour,
            transcript,
            progress: None,
            settings,
            scene,
        })
    }

    pub fn start(&mut self, options: TourOptions) -> Result<()> {
        let delay = options.settle_delay();
        let receiver = self.tour.start(options).ok_or(DemoError::AlreadyRunning)?;
        self.progress = Some(receiver);
        info!(steps = self.tour.step_count(), ?delay, "tour started");
        self.pump();
        Ok(())
    }

    /// Settle any pending navigation and let due timers fire, repeating
    /// until the controller is idle or showing.
    pub fn pump(&mut self) {
        loop {
            if self.settings.async_navigation && self.tour.navigation_settled() {
                debug!("navigation settled");
            }
            match self.tour.next_deadline() {
                Some(delay) => {
                    self.tour.advance_time(delay);
                }
                None => break,
            }
        }
        self.collect_progress();
    }

    pub fn apply(&mut self, action: &ScriptAction) {
        self.record(Entry::Action {
            action: action.to_string(),
        });
        let outcome = match action {
            ScriptAction::Next => self.tour.next().map_err(DemoError::from),
            ScriptAction::Prev => self.tour.prev().map_err(DemoError::from),
            ScriptAction::Close => {
                self.tour.close();
                Ok(())
            }
            ScriptAction::Wait { ms } => {
                self.tour.advance_time(Duration::from_millis(*ms));
                Ok(())
            }
            ScriptAction::Scroll { .. } | ScriptAction::Resize { .. } => {
                if let Some(event) = action.viewport_event() {
                    self.tour.handle_viewport_event(event);
                }
                Ok(())
            }
            ScriptAction::Move { step, left, top } => self.move_anchor(step, *left, *top),
            ScriptAction::Unregister { step } => {
                self.tour.unregister_target(step);
                Ok(())
            }
        };
        if let Err(err) = outcome {
            self.record(Entry::Rejected {
                action: action.to_string(),
                reason: err.to_string(),
            });
        }
        if !matches!(action, ScriptAction::Wait { .. }) {
            self.pump();
        } else {
            self.collect_progress();
        }
    }

    /// Run the script; with no script, press "next" until the tour ends.
    pub fn run_script(&mut self, actions: &[ScriptAction]) {
        if actions.is_empty() {
            let limit = self.tour.step_count() + 1;
            for _ in 0..limit {
                if !self.tour.is_in_progress() {
                    break;
                }
                self.apply(&ScriptAction::Next);
            }
            return;
        }
        for action in actions {
            self.apply(action);
        }
    }

    pub fn finish(mut self) -> Vec<Entry> {
        if self.tour.is_in_progress() {
            self.apply(&ScriptAction::Close);
        }
        self.collect_progress();
        drop(self.tour);
        Rc::try_unwrap(self.transcript)
            .map(|cell| cell.into_inner())
            .unwrap_or_else(|shared| shared.borrow().clone())
    }

    #[must_use]
    pub fn tour(&self) -> &TourController {
        &self.tour
    }

    fn move_anchor(&mut self, step: &str, left: f64, top: f64) -> Result<()> {
        let anchor = self
            .scene
            .anchors
            .iter_mut()
            .find(|anchor| anchor.step == step)
            .ok_or_else(|| wayfinder::TourError::UnknownStep {
                name: step.to_string(),
            })?;
        anchor.left = left;
        anchor.top = top;
        let target = anchor.bounding_box();
        self.tour.move_target(step, target)?;
        Ok(())
    }

    fn collect_progress(&mut self) {
        let Some(receiver) = &self.progress else {
            return;
        };
        let infos: Vec<_> = receiver.try_iter().collect();
        for info in infos {
            self.record(Entry::Step(info));
        }
    }

    fn record(&self, entry: Entry) {
        self.transcript.borrow_mut().push(entry);
    }
}
