use std::path::PathBuf;

use thiserror::Error;
use wayfinder::{ConfigError, TourError};

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("tour error: {0}")]
    Tour(#[from] TourError),

    #[error("invalid script action `{action}`: {reason}")]
    Script { action: String, reason: String },

    #[error("{count} validation problem(s) found")]
    Invalid { count: usize },

    #[error("tour was already running")]
    AlreadyRunning,
}

impl DemoError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Invalid { .. } => 2,
            Self::Script { .. } => 64,
            _ => 1,
        }
    }

    pub fn config(path: impl Into<PathBuf>, source: ConfigError) -> Self {
        Self::Config {
            path: path.into(),
            source,
        }
    }

    pub fn script(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Script {
            action: action.into(),
            reason: reason.into(),
        }
    }
}
