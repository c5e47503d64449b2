//! Per-command cooldown gate.

use std::time::{Duration, Instant};

/// Minimum spacing between two executions of one command.
///
/// Timestamps come from [`Instant`], so wall-clock adjustments never open or
/// close the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cooldown {
    duration: Duration,
    last_fired: Option<Instant>,
}

impl Cooldown {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            last_fired: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn last_fired(&self) -> Option<Instant> {
        self.last_fired
    }

    /// Open if never fired, or at least `duration` has elapsed since.
    pub fn is_ready(&self, now: Instant) -> bool {
        match self.last_fired {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.duration,
        }
    }

    /// Record a firing at `now` if the gate is open.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.last_fired = Some(now);
        true
    }
}
