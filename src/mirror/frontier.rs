// src/mirror/frontier.rs
// =============================================================================
// The frontier: what is left to download, and what we have already seen.
//
// Two FIFO queues:
// - text:   .html/.css/.js files, scanned for more links after download
// - assets: images and fonts, just copied
//
// And one dedup map from RemotePath to its state, keyed without the query
// suffix: "a.css?v=1" and "a.css" are the same file on disk, so they are
// the same entry. A path enters the map exactly once, through claim(), and
// is never removed. Whoever wins the
// claim is the only one allowed to queue (and therefore fetch) the path.
//
// Everything here is safe to share between workers without extra locks:
// SegQueue is a lock-free MPMC queue, and DashMap shards its locks so that
// entry() is a single atomic insert-if-absent.
// =============================================================================

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam::queue::SegQueue;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::links::{RemotePath, ResourceKind};

// Where a discovered path is in its lifecycle
//
// "Unseen" is simply not being in the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionState {
    /// Some worker owns this path (queued, in flight, or failed for good)
    Claimed,
    /// Downloaded (or found on disk) at this local path
    Materialized(PathBuf),
}

// One unit of work for a worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub path: RemotePath,
    pub local: PathBuf,
    pub kind: ResourceKind,
}

impl WorkItem {
    pub fn new(path: RemotePath, kind: ResourceKind, root: &Path) -> Self {
        let local = path.to_local(root);
        Self { path, local, kind }
    }
}

#[derive(Default)]
pub struct Frontier {
    seen: DashMap<RemotePath, ResolutionState>,
    text: SegQueue<WorkItem>,
    assets: SegQueue<WorkItem>,
    materialized: AtomicUsize,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    // Returns true if this call is the first to see `path`
    //
    // Never split this into contains() + insert(): two workers could both
    // pass the check and fetch the same file twice.
    pub fn claim(&self, path: &RemotePath) -> bool {
        match self.seen.entry(path.key()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(ResolutionState::Claimed);
                true
            }
        }
    }

    pub fn enqueue(&self, item: WorkItem) {
        match item.kind {
            ResourceKind::Text => self.text.push(item),
            ResourceKind::Asset => self.assets.push(item),
        }
    }

    /// Next item to work on; text first so new links show up early
    pub fn next(&self) -> Option<WorkItem> {
        self.text.pop().or_else(|| self.assets.pop())
    }

    pub fn materialize(&self, path: &RemotePath, local: PathBuf) {
        let previous = self
            .seen
            .insert(path.key(), ResolutionState::Materialized(local));
        if !matches!(previous, Some(ResolutionState::Materialized(_))) {
            self.materialized.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[cfg(test)]
    pub fn state(&self, path: &RemotePath) -> Option<ResolutionState> {
        self.seen.get(&path.key()).map(|entry| entry.value().clone())
    }

    // Read-only observers, used for progress output and the final summary

    pub fn discovered(&self) -> usize {
        self.seen.len()
    }

    pub fn materialized(&self) -> usize {
        self.materialized.load(Ordering::Relaxed)
    }

    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    pub fn asset_len(&self) -> usize {
        self.assets.len()
    }

    pub fn queued(&self) -> usize {
        self.text_len() + self.asset_len()
    }
}
