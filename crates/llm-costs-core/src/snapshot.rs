//! Versioned, atomically swappable views of the record set.
//!
//! The harvested set is shared by many concurrent queries but refreshed
//! wholesale. Each refresh installs a brand-new [`Snapshot`] behind an
//! atomic swap; readers that already loaded one keep it untouched for
//! the duration of their query, so no reader ever observes a partially
//! updated set.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::record::RecordSet;

/// An immutable view of the record set, tagged with the version that
/// produced it.
#[derive(Debug)]
pub struct Snapshot {
    pub version: u64,
    pub records: RecordSet,
}

/// Holder for the current snapshot.
pub struct SnapshotStore {
    current: ArcSwap<Snapshot>,
    next_version: AtomicU64,
}

impl SnapshotStore {
    pub fn new(records: RecordSet) -> Self {
        Self {
            current: ArcSwap::from_pointee(Snapshot { version: 1, records }),
            next_version: AtomicU64::new(2),
        }
    }

    /// The snapshot as of this call. Hold it for the whole query; later
    /// [`replace`](Self::replace) calls do not affect it.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Install `records` as the new current snapshot and return it.
    pub fn replace(&self, records: RecordSet) -> Arc<Snapshot> {
        let version = self.next_version.fetch_add(1, Ordering::Relaxed);
        let snapshot = Arc::new(Snapshot { version, records });
        self.current.store(Arc::clone(&snapshot));
        snapshot
    }
}
