//! Generation counter that keeps overlapping requests from applying out of order
//!
//! Each request takes a ticket when it is issued. A response is applied only
//! if no request issued after it has already been applied, so the latest
//! issued request wins even when responses arrive reordered.

use std::sync::atomic::{AtomicU64, Ordering};

/// Position of a request in issue order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct Sequencer {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a ticket for a request about to be sent
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Record `ticket` as applied if it is newer than everything applied so
    /// far. Must be called while holding the lock that guards the state the
    /// response is about to overwrite.
    pub fn admit(&self, ticket: Ticket) -> bool {
        let previous = self.applied.fetch_max(ticket.0, Ordering::SeqCst);
        previous < ticket.0
    }
}
