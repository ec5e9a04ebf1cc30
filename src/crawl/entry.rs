// src/crawl/entry.rs
// =============================================================================
// A QueueEntry is one admitted address plus where it was found.
//
// The id ties a dispatched fetch back to its entry when the fetch completes.
// The queue hands ids out (CrawlQueue::next_id), so they stay unique even when
// one queue outlives several crawls.
// =============================================================================

use std::fmt;

use crate::address::Address;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    pub const FIRST: EntryId = EntryId(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub id: EntryId,
    pub address: Address,
    /// None for the seed
    pub discovered_on: Option<Address>,
}

impl QueueEntry {
    pub fn new(id: EntryId, address: Address, discovered_on: Option<Address>) -> Self {
        Self {
            id,
            address,
            discovered_on,
        }
    }

    pub fn is_seed(&self) -> bool {
        self.discovered_on.is_none()
    }
}
