//! Sequence numbers that let callers discard stale responses.
//!
//! When a user switches branch twice in quick succession, the response for
//! the first selection may arrive after the second. Each fetch takes a
//! [`RequestTicket`] for its logical target; only the most recently issued
//! ticket for that target is accepted.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

/// Proof that a request was issued for a target at a given sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    target: String,
    sequence: u64,
}

impl RequestTicket {
    /// Logical target the request was issued for.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Sequence number of the request (starting at 1).
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Issues monotonically increasing tickets per target.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: Mutex<HashMap<String, u64>>,
}

impl RequestSequencer {
    /// Creates a sequencer with no issued tickets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next ticket for `target`, superseding earlier ones.
    pub fn issue(&self, target: &str) -> RequestTicket {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        let counter = latest.entry(target.to_owned()).or_insert(0);
        *counter = counter.saturating_add(1);
        RequestTicket {
            target: target.to_owned(),
            sequence: *counter,
        }
    }

    /// True when `ticket` is the latest issued for its target.
    #[must_use]
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        latest.get(&ticket.target) == Some(&ticket.sequence)
    }

    /// Returns `value` when `ticket` is current, `None` when superseded.
    pub fn accept<T>(&self, ticket: &RequestTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            debug!(
                fetch_target = ticket.target(),
                sequence = ticket.sequence(),
                "discarding stale response"
            );
            None
        }
    }
}
