//! Search-as-you-type debouncing.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Default quiet period after the last keystroke.
pub const QUIET_PERIOD: Duration = Duration::from_millis(300);
/// Minimum query length for place lookups.
pub const PLACE_MIN_CHARS: usize = 3;
/// Minimum query length for film title lookups.
pub const TITLE_MIN_CHARS: usize = 2;
/// Minimum query length for ticker lookups.
pub const TICKER_MIN_CHARS: usize = 2;

/// Decides whether a query is long enough to warrant a suggestion fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestPolicy {
    pub min_chars: usize,
    pub quiet: Duration,
}

impl SuggestPolicy {
    pub const fn new(min_chars: usize, quiet: Duration) -> Self {
        Self { min_chars, quiet }
    }

    pub const fn place() -> Self {
        Self::new(PLACE_MIN_CHARS, QUIET_PERIOD)
    }

    pub const fn title() -> Self {
        Self::new(TITLE_MIN_CHARS, QUIET_PERIOD)
    }

    pub const fn ticker() -> Self {
        Self::new(TICKER_MIN_CHARS, QUIET_PERIOD)
    }

    /// Returns `true` if `query` has at least `min_chars` characters once
    /// surrounding whitespace is removed.
    pub fn accepts(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.min_chars
    }
}

/// Runs at most one pending job, `delay` after it was last scheduled.
///
/// Scheduling again before the delay elapses aborts the pending job.
/// Once a job's delay has elapsed it runs on its own task, so a later
/// `schedule` or `cancel` no longer affects it.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replaces any pending job with `job`. Must be called inside a tokio
    /// runtime.
    pub fn schedule<F>(&mut self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let deadline = Instant::now() + self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            tokio::spawn(job);
        }));
    }

    /// Aborts the pending job, if it has not fired yet.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Returns `true` while a scheduled job is still waiting out its delay.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(QUIET_PERIOD)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
