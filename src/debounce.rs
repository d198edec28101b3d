use std::time::{Duration, Instant};

use crate::config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending { deadline: Instant },
    Fired,
}

/// Collapses a burst of events into one action taken `delay` after the last
/// event of the burst.
///
/// The host reports events with [`trigger`](Self::trigger) and calls
/// [`poll`](Self::poll) from its event loop; `poll` returns `true` exactly once
/// per burst.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    state: DebounceState,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(config::RESIZE_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: DebounceState::Idle,
        }
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Record an event at `now`, pushing the deadline back.
    pub fn trigger(&mut self, now: Instant) {
        self.state = DebounceState::Pending {
            deadline: now + self.delay,
        };
    }

    /// Advance to `now`. Returns `true` if the pending action should run.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.state {
            DebounceState::Pending { deadline } if now >= deadline => {
                self.state = DebounceState::Fired;
                true
            }
            DebounceState::Fired => {
                self.state = DebounceState::Idle;
                false
            }
            _ => false,
        }
    }

    /// Drop any pending action.
    pub fn cancel(&mut self) {
        self.state = DebounceState::Idle;
    }
}
