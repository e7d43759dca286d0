//! Monotonic request generations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifies one issued request. Only the most recently issued ticket of
/// a [`Generation`] is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Per-widget counter. Cloning shares the counter, so a spawned task can
/// check whether its ticket is still current before committing.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    latest: Arc<AtomicU64>,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new ticket, superseding every earlier one.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Returns `true` if no newer ticket has been issued since `ticket`.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Supersedes every outstanding ticket without issuing a request.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}
