// src/crawl/queue.rs
// =============================================================================
// This module defines the crawl queue: every address the crawler has ever
// admitted, in order, plus which of them have been dispatched.
//
// How it is used:
// 1. The crawler adds the seed
// 2. The dispatcher asks for the first entry not yet processed
// 3. It marks that entry processed and fetches it
// 4. Links found on the page are added to the back of the queue
// 5. Repeat until nothing is pending
//
// Deduplication is permanent: once an address has been added it can never be
// added again, even after it has been fetched.
//
// Rust concepts:
// - Traits: CrawlQueue is an interface, InMemoryCrawlQueue one implementation
// - Mutex: lets several tasks share and modify the queue safely
// - HashSet / HashMap: O(1) "have we seen this?" lookups
// =============================================================================

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::address::Address;
use crate::crawl::entry::{EntryId, QueueEntry};

/// Ordered, deduplicating store of crawl entries.
///
/// All methods take `&self`: one queue is shared by the dispatcher and the
/// completion handlers, so implementations do their own locking. `add` must
/// check-and-insert atomically.
pub trait CrawlQueue: Send + Sync {
    /// Hands out an id no entry of this queue has used or will use.
    fn next_id(&self) -> EntryId;

    /// Appends `entry` unless its address was ever added before.
    /// Returns true if the entry was admitted.
    fn add(&self, entry: QueueEntry) -> bool;

    /// True if the address was ever added (pending, in flight or processed).
    fn has(&self, address: &Address) -> bool;

    /// The earliest entry not yet processed. Does not remove it.
    fn next_pending(&self) -> Option<QueueEntry>;

    fn mark_processed(&self, entry: &QueueEntry);

    fn is_processed(&self, entry: &QueueEntry) -> bool;

    fn has_pending(&self) -> bool;

    fn by_id(&self, id: EntryId) -> Option<QueueEntry>;

    /// Number of entries ever admitted.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
struct QueueState {
    entries: Vec<QueueEntry>,
    positions: HashMap<EntryId, usize>,
    addresses: HashSet<String>,
    processed: HashSet<EntryId>,
    // Every entry before this index is processed
    cursor: usize,
    next_id: EntryId,
}

impl QueueState {
    fn advance_cursor(&mut self) {
        while let Some(entry) = self.entries.get(self.cursor) {
            if !self.processed.contains(&entry.id) {
                break;
            }
            self.cursor += 1;
        }
    }

    fn first_pending(&self) -> Option<&QueueEntry> {
        self.entries[self.cursor..]
            .iter()
            .find(|entry| !self.processed.contains(&entry.id))
    }
}

/// The default queue: everything lives in memory behind one mutex.
#[derive(Debug, Default)]
pub struct InMemoryCrawlQueue {
    state: Mutex<QueueState>,
}

impl InMemoryCrawlQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every admitted entry, in admission order.
    pub fn entries(&self) -> Vec<QueueEntry> {
        self.lock().entries.clone()
    }

    // A panic while holding the lock cannot leave the state half-written
    // (every update is a single insert or push), so a poisoned lock is safe
    // to keep using.
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CrawlQueue for InMemoryCrawlQueue {
    fn next_id(&self) -> EntryId {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id = id.next();
        id
    }

    fn add(&self, entry: QueueEntry) -> bool {
        let mut state = self.lock();

        if !state.addresses.insert(entry.address.render().to_string()) {
            return false;
        }

        // Entries built with hand-picked ids must not collide with later
        // next_id() calls
        if entry.id >= state.next_id {
            state.next_id = entry.id.next();
        }

        let position = state.entries.len();
        state.positions.insert(entry.id, position);
        state.entries.push(entry);
        true
    }

    fn has(&self, address: &Address) -> bool {
        self.lock().addresses.contains(address.render())
    }

    fn next_pending(&self) -> Option<QueueEntry> {
        let mut state = self.lock();
        state.advance_cursor();
        state.first_pending().cloned()
    }

    fn mark_processed(&self, entry: &QueueEntry) {
        let mut state = self.lock();
        state.processed.insert(entry.id);
        state.advance_cursor();
    }

    fn is_processed(&self, entry: &QueueEntry) -> bool {
        self.lock().processed.contains(&entry.id)
    }

    fn has_pending(&self) -> bool {
        self.lock().first_pending().is_some()
    }

    fn by_id(&self, id: EntryId) -> Option<QueueEntry> {
        let state = self.lock();
        state
            .positions
            .get(&id)
            .and_then(|&position| state.entries.get(position))
            .cloned()
    }

    fn len(&self) -> usize {
        self.lock().entries.len()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does next_pending() not remove the entry?
//    - The entry must stay findable by id until its fetch completes
//    - It must also keep blocking duplicates forever
//    - So "done" is a separate mark instead of a removal
//
// 2. What is the cursor for?
//    - Entries are nearly always processed front to back
//    - The cursor skips the processed prefix, so next_pending() doesn't
//      rescan the whole history every time
//
// 3. Why one Mutex around everything instead of one per field?
//    - add() has to check `addresses` and push to `entries` as one step
//    - With a single lock, no other task can sneak in between the two
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn entry(id: u64, url: &str) -> QueueEntry {
        QueueEntry::new(EntryId::new(id), Address::parse(url), None)
    }

    #[test]
    fn test_add_is_idempotent() {
        let queue = InMemoryCrawlQueue::new();
        assert!(queue.add(entry(0, "http://a.test/")));
        assert!(!queue.add(entry(1, "http://a.test/")));
        assert!(!queue.add(entry(2, "http://a.test/#top")));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_dedup_survives_processing() {
        let queue = InMemoryCrawlQueue::new();
        let first = entry(0, "http://a.test/");
        queue.add(first.clone());
        queue.mark_processed(&first);

        assert!(!queue.has_pending());
        assert!(queue.has(&Address::parse("http://a.test/")));
        assert!(!queue.add(entry(1, "http://a.test/")));
    }

    #[test]
    fn test_next_pending_returns_earliest_without_removing() {
        let queue = InMemoryCrawlQueue::new();
        queue.add(entry(0, "http://a.test/"));
        queue.add(entry(1, "http://a.test/b"));

        let next = queue.next_pending().unwrap();
        assert_eq!(next.id, EntryId::new(0));
        assert_eq!(queue.next_pending().unwrap().id, EntryId::new(0));

        queue.mark_processed(&next);
        assert!(queue.is_processed(&next));
        assert_eq!(queue.next_pending().unwrap().id, EntryId::new(1));
    }

    #[test]
    fn test_out_of_order_processing() {
        let queue = InMemoryCrawlQueue::new();
        let a = entry(0, "http://a.test/a");
        let b = entry(1, "http://a.test/b");
        let c = entry(2, "http://a.test/c");
        queue.add(a.clone());
        queue.add(b.clone());
        queue.add(c.clone());

        queue.mark_processed(&b);
        assert_eq!(queue.next_pending().unwrap().id, a.id);
        queue.mark_processed(&a);
        assert_eq!(queue.next_pending().unwrap().id, c.id);

        // Marking twice is harmless
        queue.mark_processed(&a);
        queue.mark_processed(&c);
        assert!(queue.next_pending().is_none());
        assert!(!queue.has_pending());
    }

    #[test]
    fn test_by_id() {
        let queue = InMemoryCrawlQueue::new();
        queue.add(entry(7, "http://a.test/seven"));
        assert_eq!(
            queue.by_id(EntryId::new(7)).unwrap().address.render(),
            "http://a.test/seven"
        );
        assert!(queue.by_id(EntryId::new(8)).is_none());
    }

    #[test]
    fn test_next_id_never_repeats() {
        let queue = InMemoryCrawlQueue::new();
        let first = queue.next_id();
        let second = queue.next_id();
        assert_eq!(first, EntryId::FIRST);
        assert!(second > first);

        queue.add(entry(10, "http://a.test/ten"));
        assert_eq!(queue.next_id(), EntryId::new(11));
    }

    #[test]
    fn test_concurrent_adds_admit_each_address_once() {
        let queue = Arc::new(InMemoryCrawlQueue::new());

        let handles: Vec<_> = (0..8)
            .map(|thread| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || {
                    let mut admitted = 0;
                    for page in 0..50 {
                        let id = thread * 1000 + page;
                        if queue.add(entry(id, &format!("http://a.test/{}", page))) {
                            admitted += 1;
                        }
                    }
                    admitted
                })
            })
            .collect();

        let admitted: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 50);
        assert_eq!(queue.len(), 50);
    }
}
