#![forbid(unsafe_code)]

//! Cancellation scope for one tour run.
//!
//! Each run owns a [`CancellationSource`]; every settle timer it schedules
//! carries a [`CancellationToken`] taken from that source. Closing the run
//! cancels the source, so a timer that is still queued can never show a
//! step for a run that has ended.
//!
//! ```
//! use wayfinder_runtime::cancellation::CancellationSource;
//!
//! let run = CancellationSource::new();
//! let token = run.token();
//! assert!(run.cancel());
//! assert!(token.is_cancelled());
//! assert!(!run.cancel());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable view of a run's cancellation flag.
#[derive(Clone, Debug)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

/// Owner of a run's cancellation flag.
///
/// Dropping the source leaves its tokens live. Cancel explicitly.
#[derive(Debug)]
pub struct CancellationSource {
    flag: Arc<AtomicBool>,
}

impl CancellationSource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            flag: Arc::clone(&self.flag),
        }
    }

    /// Cancel every token taken from this source. Returns `true` on the
    /// first call only.
    pub fn cancel(&self) -> bool {
        !self.flag.swap(true, Ordering::AcqRel)
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
