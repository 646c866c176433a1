//! Host-driven settle timers.
//!
//! Nothing here sleeps or spawns. The host reports elapsed time through
//! [`SettleTimers::advance`], which returns the payloads of every timer whose
//! delay has run out, in the order they were scheduled. Timers whose token is
//! cancelled are dropped without firing.

use web_time::Duration;

use crate::cancellation::CancellationToken;

#[derive(Debug)]
struct Pending<T> {
    remaining: Duration,
    token: CancellationToken,
    payload: T,
}

#[derive(Debug)]
pub struct SettleTimers<T> {
    pending: Vec<Pending<T>>,
    fired: u64,
}

impl<T> Default for SettleTimers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SettleTimers<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            fired: 0,
        }
    }

    pub fn schedule(&mut self, delay: Duration, token: CancellationToken, payload: T) {
        self.pending.push(Pending {
            remaining: delay,
            token,
            payload,
        });
    }

    /// Move time forward by `delta` and collect what fires.
    pub fn advance(&mut self, delta: Duration) -> Vec<T> {
        let mut fired = Vec::new();
        let mut kept = Vec::with_capacity(self.pending.len());
        for mut timer in self.pending.drain(..) {
            if timer.token.is_cancelled() {
                continue;
            }
            timer.remaining = timer.remaining.saturating_sub(delta);
            if timer.remaining.is_zero() {
                self.fired += 1;
                fired.push(timer.payload);
            } else {
                kept.push(timer);
            }
        }
        self.pending = kept;
        fired
    }

    /// Remove every pending timer. Returns how many were removed.
    pub fn cancel_all(&mut self) -> usize {
        let removed = self.pending.len();
        self.pending.clear();
        removed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Time until the earliest live timer fires.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending
            .iter()
            .filter(|timer| !timer.token.is_cancelled())
            .map(|timer| timer.remaining)
            .min()
    }

    /// Timers that have fired since construction.
    #[must_use]
    pub fn fired_count(&self) -> u64 {
        self.fired
    }
}
