use thiserror::Error;

use crate::controller::TourState;

pub type Result<T> = std::result::Result<T, TourError>;

#[derive(Debug, Error)]
pub enum TourError {
    #[error("no anchor registered for step `{name}`")]
    MissingTarget { name: String },

    #[error("cursor {cursor} is outside the tour sequence (len {len})")]
    SequenceExhausted { cursor: isize, len: usize },

    #[error("step `{name}` is not in the step catalog")]
    UnknownStep { name: String },

    #[error("cannot {action} while the tour is {state}")]
    InvalidTransition {
        action: &'static str,
        state: TourState,
    },

    #[error("already at the first step")]
    NoPreviousStep,
}

impl TourError {
    /// Whether this error ends the running tour when it reaches the
    /// controller.
    #[must_use]
    pub fn aborts_tour(&self) -> bool {
        matches!(
            self,
            Self::MissingTarget { .. } | Self::SequenceExhausted { .. }
        )
    }
}

/// Errors raised while loading tour options or a step catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_failures_abort_the_tour() {
        assert!(
            TourError::MissingTarget {
                name: "nodes".into()
            }
            .aborts_tour()
        );
        assert!(TourError::SequenceExhausted { cursor: 3, len: 3 }.aborts_tour());
        assert!(!TourError::NoPreviousStep.aborts_tour());
        assert!(
            !TourError::InvalidTransition {
                action: "next",
                state: TourState::Navigating,
            }
            .aborts_tour()
        );
    }

    #[test]
    fn messages_name_the_step_and_state() {
        let err = TourError::MissingTarget {
            name: "cluster-list".into(),
        };
        assert_eq!(err.to_string(), "no anchor registered for step `cluster-list`");

        let err = TourError::InvalidTransition {
            action: "prev",
            state: TourState::AwaitingSettle,
        };
        assert_eq!(err.to_string(), "cannot prev while the tour is awaiting_settle");
    }

    #[test]
    fn validation_joins_messages() {
        let err = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "validation errors: a; b");
    }
}
