//! Client-side minimum spacing between requests.

use std::time::{Duration, Instant};

/// Admits at most one call per `min_spacing`.
///
/// Calls arriving too soon are rejected and not remembered: nothing is
/// queued or retried, and the spacing is measured from the last
/// *accepted* call.
#[derive(Debug, Clone)]
pub struct Throttle {
    min_spacing: Duration,
    last_accepted: Option<Instant>,
}

impl Throttle {
    pub fn new(min_spacing: Duration) -> Self {
        Self {
            min_spacing,
            last_accepted: None,
        }
    }

    pub fn min_spacing(&self) -> Duration {
        self.min_spacing
    }

    /// Returns `true` and records `now` if a call may proceed.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.min_spacing {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }
}
