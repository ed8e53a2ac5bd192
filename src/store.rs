use tokio::sync::watch;
use tracing::debug;

use crate::model::{EntryId, LinkEntry, Platform};
use crate::reorder::reorder;

/// The ordered, mutable collection of link entries.
///
/// Every mutation that changes the collection bumps [`revision`](Self::revision)
/// and publishes the new snapshot to subscribers before returning. Index
/// based operations ignore out-of-range indices.
#[derive(Debug)]
pub struct LinkCollectionStore {
    entries: Vec<LinkEntry>,
    next_id: u64,
    revision: u64,
    tx: watch::Sender<Vec<LinkEntry>>,
}

impl LinkCollectionStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self {
            entries: Vec::new(),
            next_id: 1,
            revision: 0,
            tx,
        }
    }

    /// Append an entry with no platform and an empty url.
    pub fn add(&mut self) -> EntryId {
        let id = self.allocate_id();
        self.entries.push(LinkEntry::empty(id));
        debug!(%id, len = self.entries.len(), "added link entry");
        self.publish();
        id
    }

    pub fn remove(&mut self, index: usize) -> Option<LinkEntry> {
        if index >= self.entries.len() {
            debug!(index, len = self.entries.len(), "remove ignored, index out of range");
            return None;
        }
        let removed = self.entries.remove(index);
        debug!(id = %removed.id, index, "removed link entry");
        self.publish();
        Some(removed)
    }

    /// Choose the platform of an entry. Switching away from a different
    /// platform clears the url; picking the current platform again keeps it.
    pub fn set_platform(&mut self, index: usize, platform: Platform) -> bool {
        let Some(entry) = self.entries.get_mut(index) else {
            debug!(index, "set_platform ignored, index out of range");
            return false;
        };
        if entry.platform == Some(platform) {
            return true;
        }
        if entry.platform.is_some() {
            entry.url.clear();
        }
        entry.platform = Some(platform);
        debug!(id = %entry.id, %platform, "changed platform");
        self.publish();
        true
    }

    /// Store the raw url text as typed.
    pub fn set_url(&mut self, index: usize, value: impl Into<String>) -> bool {
        let Some(entry) = self.entries.get_mut(index) else {
            debug!(index, "set_url ignored, index out of range");
            return false;
        };
        entry.url = value.into();
        self.publish();
        true
    }

    /// Move the entry at `from` to `to`. `None` means the drag was released
    /// outside the list and nothing changes.
    pub fn reorder(&mut self, from: usize, to: Option<usize>) -> bool {
        let Some(to) = to else {
            return false;
        };
        if from >= self.entries.len() {
            return false;
        }
        // the engine clamps past-the-end drops onto the last row
        let to = to.min(self.entries.len() - 1);
        if to == from {
            return false;
        }
        let entries = std::mem::take(&mut self.entries);
        self.entries = reorder(entries, from, Some(to));
        debug!(from, to, "reordered links");
        self.publish();
        true
    }

    /// Replace the whole collection with freshly identified entries.
    pub fn replace(&mut self, links: impl IntoIterator<Item = (Option<Platform>, String)>) {
        let entries: Vec<LinkEntry> = links
            .into_iter()
            .map(|(platform, url)| LinkEntry {
                id: self.allocate_id(),
                platform,
                url,
            })
            .collect();
        self.entries = entries;
        debug!(len = self.entries.len(), "replaced link collection");
        self.publish();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.publish();
    }

    pub fn snapshot(&self) -> &[LinkEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mutation counter, used to detect edits made while a save was pending.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Receive a new snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<LinkEntry>> {
        self.tx.subscribe()
    }

    fn allocate_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }

    fn publish(&mut self) {
        self.revision += 1;
        self.tx.send_replace(self.entries.clone());
    }
}

impl Default for LinkCollectionStore {
    fn default() -> Self {
        Self::new()
    }
}
