//! Progress events emitted while a tour runs.

use std::fmt;
use std::sync::mpsc;

use serde::{Deserialize, Serialize};

/// What caused a step to be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Start,
    Next,
    Prev,
}

impl ActionType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Next => "next",
            Self::Prev => "prev",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One shown step. `number` is the 1-based sequence position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    pub number: usize,
    pub name: String,
    pub route: String,
    pub action_type: ActionType,
}

/// Receiving half of a run's progress stream. The stream ends (`recv`
/// returns `Err`) once the run closes.
pub type ProgressReceiver = mpsc::Receiver<StepInfo>;
