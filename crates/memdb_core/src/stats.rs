//! Store statistics.
//!
//! Counters are bumped by every [`Store`](crate::Store) operation and can be
//! read at any time without taking the store lock.
//!
//! ```
//! use memdb_core::Store;
//!
//! let store = Store::new();
//! assert_eq!(store.stats().adds, 0);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Operation counters for a store.
///
/// All counters are atomic and only ever increase.
#[derive(Debug, Default)]
pub struct StoreStats {
    adds: AtomicU64,
    reads: AtomicU64,
    updates: AtomicU64,
    removes: AtomicU64,
    scans: AtomicU64,
    bytes_written: AtomicU64,
    bytes_read: AtomicU64,
    errors: AtomicU64,
}

impl StoreStats {
    /// Creates a zeroed stats block.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_add(&self, bytes: u64) {
        self.adds.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Records one decoded record handed back to a caller.
    pub(crate) fn record_read(&self, bytes: u64) {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn record_update(&self, bytes: u64) {
        self.updates.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn record_remove(&self) {
        self.removes.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a linear pass over a collection.
    pub(crate) fn record_scan(&self) {
        self.scans.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of records added.
    pub fn adds(&self) -> u64 {
        self.adds.load(Ordering::Relaxed)
    }

    /// Returns the number of records returned to callers.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Returns the number of records replaced.
    pub fn updates(&self) -> u64 {
        self.updates.load(Ordering::Relaxed)
    }

    /// Returns the number of records removed.
    pub fn removes(&self) -> u64 {
        self.removes.load(Ordering::Relaxed)
    }

    /// Returns the number of collection scans.
    pub fn scans(&self) -> u64 {
        self.scans.load(Ordering::Relaxed)
    }

    /// Returns the total encoded bytes stored by adds and updates.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    /// Returns the total encoded bytes decoded for callers.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read.load(Ordering::Relaxed)
    }

    /// Returns the number of failed operations.
    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            adds: self.adds(),
            reads: self.reads(),
            updates: self.updates(),
            removes: self.removes(),
            scans: self.scans(),
            bytes_written: self.bytes_written(),
            bytes_read: self.bytes_read(),
            errors: self.errors(),
        }
    }
}

/// A point-in-time copy of [`StoreStats`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Records added.
    pub adds: u64,
    /// Records returned to callers.
    pub reads: u64,
    /// Records replaced.
    pub updates: u64,
    /// Records removed.
    pub removes: u64,
    /// Collection scans.
    pub scans: u64,
    /// Encoded bytes stored.
    pub bytes_written: u64,
    /// Encoded bytes decoded.
    pub bytes_read: u64,
    /// Failed operations.
    pub errors: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_zero() {
        let stats = StoreStats::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn record_operations() {
        let stats = StoreStats::new();

        stats.record_add(40);
        stats.record_update(10);
        assert_eq!(stats.adds(), 1);
        assert_eq!(stats.updates(), 1);
        assert_eq!(stats.bytes_written(), 50);

        stats.record_read(40);
        stats.record_read(12);
        stats.record_scan();
        stats.record_remove();
        stats.record_error();

        let snap = stats.snapshot();
        assert_eq!(snap.reads, 2);
        assert_eq!(snap.bytes_read, 52);
        assert_eq!(snap.scans, 1);
        assert_eq!(snap.removes, 1);
        assert_eq!(snap.errors, 1);
    }

    #[test]
    fn concurrent_updates() {
        use std::sync::Arc;
        use std::thread;

        let stats = Arc::new(StoreStats::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let s = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..125 {
                        s.record_add(1);
                        s.record_scan();
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(stats.adds(), 1000);
        assert_eq!(stats.scans(), 1000);
        assert_eq!(stats.bytes_written(), 1000);
    }
}
