//! Scripted user actions for a headless run.
//!
//! A script is a comma-separated list such as
//! `next,scroll:0x240,resize:1024x768,prev,close`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use wayfinder::ViewportEvent;

use crate::error::DemoError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    Next,
    Prev,
    Close,
    /// Advance the settle clock by this many milliseconds.
    Wait { ms: u64 },
    Scroll { x: f64, y: f64 },
    Resize { width: f64, height: f64 },
    /// Move a step's anchor, re-registering it.
    Move { step: String, left: f64, top: f64 },
    Unregister { step: String },
}

impl ScriptAction {
    #[must_use]
    pub fn viewport_event(&self) -> Option<ViewportEvent> {
        match *self {
            Self::Scroll { x, y } => Some(ViewportEvent::Scroll { x, y }),
            Self::Resize { width, height } => Some(ViewportEvent::Resize { width, height }),
            _ => None,
        }
    }
}

fn number(action: &str, raw: &str) -> Result<f64, DemoError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DemoError::script(action, format!("`{raw}` is not a number")))
}

fn pair(action: &str, raw: &str) -> Result<(f64, f64), DemoError> {
    let (a, b) = raw
        .split_once('x')
        .ok_or_else(|| DemoError::script(action, "expected <a>x<b>"))?;
    Ok((number(action, a)?, number(action, b)?))
}

impl FromStr for ScriptAction {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (verb, arg) = match s.split_once(':') {
            Some((verb, arg)) => (verb, Some(arg)),
            None => (s, None),
        };
        match (verb, arg) {
            ("next", None) => Ok(Self::Next),
            ("prev", None) => Ok(Self::Prev),
            ("close", None) => Ok(Self::Close),
            ("wait", Some(ms)) => ms
                .trim()
                .parse()
                .map(|ms| Self::Wait { ms })
                .map_err(|_| DemoError::script(s, "expected milliseconds")),
            ("scroll", Some(arg)) => {
                let (x, y) = pair(s, arg)?;
                Ok(Self::Scroll { x, y })
            }
            ("resize", Some(arg)) => {
                let (width, height) = pair(s, arg)?;
                Ok(Self::Resize { width, height })
            }
            ("move", Some(arg)) => {
                let (step, to) = arg
                    .split_once('@')
                    .ok_or_else(|| DemoError::script(s, "expected move:<step>@<left>x<top>"))?;
                let (left, top) = pair(s, to)?;
                Ok(Self::Move {
                    step: step.trim().to_string(),
                    left,
                    top,
                })
            }
            ("unregister", Some(step)) if !step.trim().is_empty() => Ok(Self::Unregister {
                step: step.trim().to_string(),
            }),
            _ => Err(DemoError::script(s, "unknown action")),
        }
    }
}

impl fmt::Display for ScriptAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next => f.write_str("next"),
            Self::Prev => f.write_str("prev"),
            Self::Close => f.write_str("close"),
            Self::Wait { ms } => write!(f, "wait:{ms}"),
            Self::Scroll { x, y } => write!(f, "scroll:{x}x{y}"),
            Self::Resize { width, height } => write!(f, "resize:{width}x{height}"),
            Self::Move { step, left, top } => write!(f, "move:{step}@{left}x{top}"),
            Self::Unregister { step } => write!(f, "unregister:{step}"),
        }
    }
}

/// Parse a comma-separated script. Empty segments are skipped.
pub fn parse_script(script: &str) -> Result<Vec<ScriptAction>, DemoError> {
    script
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}
