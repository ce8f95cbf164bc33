//! # Dead-Letter Store
//!
//! Volatile, process-lifetime collection of dead letters in arrival order.
//!
//! The list lives behind `RwLock<Arc<Vec<_>>>`. Writers mutate through
//! `Arc::make_mut`, so a snapshot handed out earlier is never touched; readers
//! only hold the lock long enough to clone the `Arc`.
//!
//! Every `clear` bumps a clear epoch under the write lock. An entry taken for
//! replay carries the epoch it was taken in, and `restore` refuses it once a
//! later `clear` has run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::constants::operations;
use crate::models::DeadLetterEntry;

#[derive(Debug, Default)]
pub struct DeadLetterStore {
    entries: RwLock<Arc<Vec<DeadLetterEntry>>>,
    /// `None` keeps every entry until it is replayed or cleared
    capacity: Option<usize>,
    /// Only changed while holding the `entries` write lock
    clear_epoch: AtomicU64,
}

/// An entry removed by [`DeadLetterStore::take_for_replay`]
#[derive(Debug, Clone, PartialEq)]
pub struct TakenEntry {
    pub entry: DeadLetterEntry,
    epoch: u64,
}

impl DeadLetterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounded store that drops the oldest entry once `capacity` is exceeded
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            entries: RwLock::new(Arc::new(Vec::new())),
            capacity,
            clear_epoch: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn add(&self, entry: DeadLetterEntry) {
        let evicted = {
            let mut guard = self.entries.write();
            let entries = Arc::make_mut(&mut *guard);
            entries.push(entry);
            self.evict_over_capacity(entries)
        };

        if let Some(evicted) = evicted {
            self.log_eviction(&evicted);
        }
    }

    fn evict_over_capacity(&self, entries: &mut Vec<DeadLetterEntry>) -> Option<DeadLetterEntry> {
        match self.capacity {
            Some(capacity) if entries.len() > capacity => Some(entries.remove(0)),
            _ => None,
        }
    }

    fn log_eviction(&self, evicted: &DeadLetterEntry) {
        warn!(
            operation = operations::DEAD_LETTER_EVICTED,
            id = %evicted.id,
            category = %evicted.category,
            capacity = ?self.capacity,
            "Dead-letter store full, oldest entry evicted"
        );
    }

    /// Shared, immutable view of the current entries
    pub fn snapshot(&self) -> Arc<Vec<DeadLetterEntry>> {
        Arc::clone(&*self.entries.read())
    }

    /// Owned copy of every entry, oldest first
    pub fn all(&self) -> Vec<DeadLetterEntry> {
        self.snapshot().as_ref().clone()
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<DeadLetterEntry> {
        self.snapshot().iter().find(|entry| entry.id == id).cloned()
    }

    /// Remove and return the entry in a single write; at most one caller
    /// ever receives a given entry.
    pub fn take_by_id(&self, id: Uuid) -> Option<DeadLetterEntry> {
        let mut guard = self.entries.write();
        let position = guard.iter().position(|entry| entry.id == id)?;
        Some(Arc::make_mut(&mut *guard).remove(position))
    }

    pub fn remove_by_id(&self, id: Uuid) -> bool {
        self.take_by_id(id).is_some()
    }

    /// Remove an entry for replay, remembering the clear epoch it was taken in
    pub fn take_for_replay(&self, id: Uuid) -> Option<TakenEntry> {
        let mut guard = self.entries.write();
        let position = guard.iter().position(|entry| entry.id == id)?;
        let epoch = self.clear_epoch.load(Ordering::Acquire);
        let entry = Arc::make_mut(&mut *guard).remove(position);
        Some(TakenEntry { entry, epoch })
    }

    /// Put a taken entry back in its arrival position
    ///
    /// Returns `false` without restoring when the store was cleared after the
    /// entry was taken. The capacity bound applies as for `add`.
    pub fn restore(&self, taken: TakenEntry) -> bool {
        let TakenEntry { entry, epoch } = taken;

        let evicted = {
            let mut guard = self.entries.write();
            if self.clear_epoch.load(Ordering::Acquire) != epoch {
                debug!(id = %entry.id, "Store cleared since entry was taken, not restoring");
                return false;
            }

            let position = guard
                .iter()
                .position(|existing| existing.received_at > entry.received_at)
                .unwrap_or(guard.len());
            let entries = Arc::make_mut(&mut *guard);
            entries.insert(position, entry);
            self.evict_over_capacity(entries)
        };

        if let Some(evicted) = evicted {
            self.log_eviction(&evicted);
        }
        true
    }

    /// Drop every entry, returning how many were removed
    pub fn clear(&self) -> usize {
        let mut guard = self.entries.write();
        let removed = guard.len();
        *guard = Arc::new(Vec::new());
        self.clear_epoch.fetch_add(1, Ordering::Release);
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FailureCategory;

    fn entry(reason: &str) -> DeadLetterEntry {
        DeadLetterEntry::new(reason, format!("payload-{reason}"), FailureCategory::ValidationError)
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let store = DeadLetterStore::new();
        for reason in ["a", "b", "c"] {
            store.add(entry(reason));
        }

        let reasons: Vec<String> = store.all().into_iter().map(|e| e.reason).collect();
        assert_eq!(reasons, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_find_and_remove_by_id() {
        let store = DeadLetterStore::new();
        let first = entry("a");
        let id = first.id;
        store.add(first);
        store.add(entry("b"));

        assert_eq!(store.find_by_id(id).map(|e| e.reason), Some("a".to_string()));
        assert!(store.remove_by_id(id));
        assert!(store.find_by_id(id).is_none());
        assert!(!store.remove_by_id(id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_writes() {
        let store = DeadLetterStore::new();
        store.add(entry("a"));

        let snapshot = store.snapshot();
        store.add(entry("b"));
        store.clear();

        assert_eq!(snapshot.len(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_take_is_exclusive() {
        let store = DeadLetterStore::new();
        let e = entry("a");
        let id = e.id;
        store.add(e);

        assert!(store.take_by_id(id).is_some());
        assert!(store.take_by_id(id).is_none());
    }

    #[test]
    fn test_restore_returns_entry_to_arrival_position() {
        let store = DeadLetterStore::new();
        let base = chrono::Utc::now();
        let mut first = entry("a");
        let mut middle = entry("b");
        let mut last = entry("c");
        first.received_at = base;
        middle.received_at = base + chrono::Duration::milliseconds(1);
        last.received_at = base + chrono::Duration::milliseconds(2);
        let middle_id = middle.id;
        store.add(first);
        store.add(middle);
        store.add(last);

        let taken = store.take_for_replay(middle_id).unwrap();
        assert!(store.restore(taken));

        let reasons: Vec<String> = store.all().into_iter().map(|e| e.reason).collect();
        assert_eq!(reasons, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_restore_after_clear_is_dropped() {
        let store = DeadLetterStore::new();
        let e = entry("a");
        let id = e.id;
        store.add(e);

        let taken = store.take_for_replay(id).unwrap();
        store.add(entry("b"));
        assert_eq!(store.clear(), 1);

        assert!(!store.restore(taken));
        assert!(store.is_empty());
    }

    #[test]
    fn test_restore_respects_capacity() {
        let store = DeadLetterStore::with_capacity(Some(2));
        let base = chrono::Utc::now();
        let mut oldest = entry("a");
        oldest.received_at = base - chrono::Duration::seconds(1);
        let oldest_id = oldest.id;
        store.add(oldest);
        store.add(entry("b"));

        let taken = store.take_for_replay(oldest_id).unwrap();
        store.add(entry("c"));
        assert!(store.restore(taken));

        let reasons: Vec<String> = store.all().into_iter().map(|e| e.reason).collect();
        assert_eq!(reasons, vec!["b", "c"]);
    }

    #[test]
    fn test_bounded_store_evicts_oldest() {
        let store = DeadLetterStore::with_capacity(Some(2));
        for reason in ["a", "b", "c"] {
            store.add(entry(reason));
        }

        let reasons: Vec<String> = store.all().into_iter().map(|e| e.reason).collect();
        assert_eq!(reasons, vec!["b", "c"]);
        assert_eq!(store.capacity(), Some(2));
    }

    #[test]
    fn test_clear_reports_removed_count() {
        let store = DeadLetterStore::new();
        store.add(entry("a"));
        store.add(entry("b"));

        assert_eq!(store.clear(), 2);
        assert_eq!(store.clear(), 0);
    }
}
