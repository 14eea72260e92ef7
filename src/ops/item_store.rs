use std::collections::HashSet;

use crate::io::blob_store::StoreError;
use crate::io::persistence::{Persistence, encode};
use crate::model::{Item, ItemId};

/// Error type for item operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("item text is empty")]
    EmptyText,
    #[error("item not found: {0}")]
    NotFound(ItemId),
}

/// What `reorder` had to repair in the requested order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReorderReport {
    /// Ids in the request that the store does not hold (or repeats)
    pub ignored: Vec<ItemId>,
    /// Store ids the request left out, appended at the end in prior order
    pub reappended: Vec<ItemId>,
}

impl ReorderReport {
    pub fn is_clean(&self) -> bool {
        self.ignored.is_empty() && self.reappended.is_empty()
    }
}

/// A save that did not reach storage, with the blob that was lost
#[derive(Debug)]
pub struct SaveFailure {
    pub error: StoreError,
    pub blob: String,
    /// The previous save succeeded, so this starts a run of failures
    pub first_in_run: bool,
}

/// Source of creation timestamps in milliseconds
pub type Clock = Box<dyn Fn() -> u64>;

fn system_clock() -> Clock {
    Box::new(|| chrono::Utc::now().timestamp_millis().max(0) as u64)
}

/// The canonical ordered item list.
///
/// Every mutation writes the whole list through the persistence adapter
/// before returning. A failed write keeps the in-memory change and is
/// parked until the caller collects it with [`ItemStore::take_save_failure`].
pub struct ItemStore {
    items: Vec<Item>,
    persistence: Persistence,
    clock: Clock,
    /// Highest id ever handed out or loaded
    last_id: ItemId,
    save_failure: Option<SaveFailure>,
    /// The most recent save did not reach storage
    failing: bool,
}

impl ItemStore {
    /// Load the stored list and take ownership of the persistence adapter
    pub fn open(persistence: Persistence) -> Self {
        let items = persistence.load();
        let last_id = items.iter().map(|i| i.id).max().unwrap_or(0);
        ItemStore {
            items,
            persistence,
            clock: system_clock(),
            last_id,
            save_failure: None,
            failing: false,
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> u64 + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn all(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a new item. Whitespace-only text is rejected without touching
    /// storage.
    pub fn add(&mut self, text: &str) -> Result<Item, ItemError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ItemError::EmptyText);
        }
        let id = self.next_id();
        let item = Item::new(id, text);
        self.items.push(item.clone());
        self.persist();
        Ok(item)
    }

    /// Replace an item's text. Whitespace-only text leaves it unchanged.
    pub fn update(&mut self, id: ItemId, new_text: &str) -> Result<(), ItemError> {
        let new_text = new_text.trim();
        let item = self.find_mut(id)?;
        if new_text.is_empty() {
            return Err(ItemError::EmptyText);
        }
        item.text = new_text.to_string();
        self.persist();
        Ok(())
    }

    /// Flip an item's done flag, returning the new value
    pub fn toggle_done(&mut self, id: ItemId) -> Result<bool, ItemError> {
        let item = self.find_mut(id)?;
        item.done = !item.done;
        let done = item.done;
        self.persist();
        Ok(done)
    }

    pub fn remove(&mut self, id: ItemId) -> Result<Item, ItemError> {
        let idx = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(ItemError::NotFound(id))?;
        let item = self.items.remove(idx);
        self.persist();
        Ok(item)
    }

    /// Rearrange items to follow `order`.
    ///
    /// Unknown and repeated ids are ignored. Items the order leaves out keep
    /// their relative order and go to the end, so a bad order never drops
    /// data.
    pub fn reorder(&mut self, order: &[ItemId]) -> ReorderReport {
        let mut report = ReorderReport::default();
        let mut placed: HashSet<ItemId> = HashSet::with_capacity(order.len());
        let mut remaining = std::mem::take(&mut self.items);
        let mut reordered = Vec::with_capacity(remaining.len());

        for &id in order {
            if placed.contains(&id) {
                report.ignored.push(id);
                continue;
            }
            match remaining.iter().position(|i| i.id == id) {
                Some(idx) => {
                    reordered.push(remaining.remove(idx));
                    placed.insert(id);
                }
                None => report.ignored.push(id),
            }
        }
        report.reappended.extend(remaining.iter().map(|i| i.id));
        reordered.append(&mut remaining);
        self.items = reordered;

        if !report.is_clean() {
            tracing::warn!(
                ignored = ?report.ignored,
                reappended = ?report.reappended,
                "reorder request did not match the stored items"
            );
        }
        self.persist();
        report
    }

    /// Collect the most recent failed save, if any
    pub fn take_save_failure(&mut self) -> Option<SaveFailure> {
        self.save_failure.take()
    }

    /// The in-memory list as a blob, if the last save did not reach storage
    pub fn unsaved_blob(&self) -> Option<String> {
        if !self.failing {
            return None;
        }
        encode(&self.items).ok()
    }

    fn find_mut(&mut self, id: ItemId) -> Result<&mut Item, ItemError> {
        self.items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(ItemError::NotFound(id))
    }

    fn next_id(&mut self) -> ItemId {
        let now = (self.clock)();
        let id = if now > self.last_id { now } else { self.last_id + 1 };
        self.last_id = id;
        id
    }

    fn persist(&mut self) {
        match self.persistence.save(&self.items) {
            Ok(()) => self.failing = false,
            Err(error) => {
                tracing::warn!(error = %error, "could not save items");
                let blob = encode(&self.items).unwrap_or_default();
                self.save_failure = Some(SaveFailure {
                    error,
                    blob,
                    first_in_run: !self.failing,
                });
                self.failing = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::blob_store::MemoryBlobStore;
    use crate::io::persistence::{TASKS_KEY, decode};
    use pretty_assertions::assert_eq;

    fn store_with(items: &[(ItemId, &str, bool)]) -> (ItemStore, MemoryBlobStore) {
        let blobs = MemoryBlobStore::new();
        let seeded: Vec<Item> = items
            .iter()
            .map(|&(id, text, done)| Item {
                id,
                text: text.to_string(),
                done,
            })
            .collect();
        blobs.seed(TASKS_KEY, &encode(&seeded).unwrap());
        let store = ItemStore::open(Persistence::new(blobs.clone())).with_clock(|| 0);
        (store, blobs)
    }

    fn persisted(blobs: &MemoryBlobStore) -> Vec<Item> {
        decode(&blobs.raw(TASKS_KEY).unwrap()).unwrap()
    }

    fn ids(store: &ItemStore) -> Vec<ItemId> {
        store.all().iter().map(|i| i.id).collect()
    }

    #[test]
    fn add_appends_with_next_id() {
        let (mut store, blobs) = store_with(&[(1, "a", false), (2, "b", false)]);
        let item = store.add("c").unwrap();
        assert_eq!(item, Item::new(3, "c"));
        assert_eq!(
            store.all(),
            &[Item::new(1, "a"), Item::new(2, "b"), Item::new(3, "c")]
        );
        assert_eq!(persisted(&blobs), store.all());
    }

    #[test]
    fn add_uses_clock_when_ahead() {
        let blobs = MemoryBlobStore::new();
        let mut store =
            ItemStore::open(Persistence::new(blobs)).with_clock(|| 1_700_000_000_000);
        assert_eq!(store.add("a").unwrap().id, 1_700_000_000_000);
        // Same millisecond: still unique and increasing
        assert_eq!(store.add("b").unwrap().id, 1_700_000_000_001);
    }

    #[test]
    fn add_trims_text() {
        let (mut store, _) = store_with(&[]);
        assert_eq!(store.add("  walk dog  ").unwrap().text, "walk dog");
    }

    #[test]
    fn add_whitespace_only_is_rejected_without_saving() {
        let (mut store, blobs) = store_with(&[(1, "a", false)]);
        assert_eq!(store.add("   "), Err(ItemError::EmptyText));
        assert_eq!(store.len(), 1);
        assert_eq!(blobs.writes(), 0);
    }

    #[test]
    fn ids_are_not_reused_after_remove() {
        let (mut store, _) = store_with(&[(1, "a", false), (2, "b", false)]);
        store.remove(2).unwrap();
        assert_eq!(store.add("c").unwrap().id, 3);
    }

    #[test]
    fn update_sets_text() {
        let (mut store, blobs) = store_with(&[(1, "a", false)]);
        store.update(1, " z ").unwrap();
        assert_eq!(store.get(1).unwrap().text, "z");
        assert_eq!(persisted(&blobs), store.all());
    }

    #[test]
    fn update_with_empty_text_keeps_original() {
        let (mut store, blobs) = store_with(&[(1, "a", false)]);
        assert_eq!(store.update(1, "  "), Err(ItemError::EmptyText));
        assert_eq!(store.get(1).unwrap().text, "a");
        assert_eq!(blobs.writes(), 0);
    }

    #[test]
    fn update_missing_is_not_found() {
        let (mut store, blobs) = store_with(&[(1, "a", false)]);
        assert_eq!(store.update(9, "x"), Err(ItemError::NotFound(9)));
        assert_eq!(blobs.writes(), 0);
    }

    #[test]
    fn toggle_flips_only_target() {
        let (mut store, blobs) = store_with(&[(1, "a", false), (2, "b", false), (3, "c", false)]);
        assert_eq!(store.toggle_done(2), Ok(true));
        let done: Vec<bool> = store.all().iter().map(|i| i.done).collect();
        assert_eq!(done, vec![false, true, false]);
        assert_eq!(persisted(&blobs), store.all());
        assert_eq!(store.toggle_done(2), Ok(false));
    }

    #[test]
    fn remove_deletes_and_persists() {
        let (mut store, blobs) = store_with(&[(1, "a", false), (2, "b", false)]);
        assert_eq!(store.remove(1).unwrap().text, "a");
        assert_eq!(ids(&store), vec![2]);
        assert_eq!(persisted(&blobs), store.all());
        assert_eq!(store.remove(1), Err(ItemError::NotFound(1)));
    }

    #[test]
    fn reorder_follows_requested_order() {
        let (mut store, blobs) = store_with(&[(1, "a", false), (2, "b", true), (3, "c", false)]);
        let report = store.reorder(&[3, 1, 2]);
        assert!(report.is_clean());
        assert_eq!(ids(&store), vec![3, 1, 2]);
        assert!(store.get(2).unwrap().done);
        assert_eq!(persisted(&blobs), store.all());
    }

    #[test]
    fn reorder_ignores_unknown_and_reappends_missing() {
        let (mut store, _) = store_with(&[
            (1, "a", false),
            (2, "b", false),
            (3, "c", false),
            (4, "d", false),
        ]);
        let report = store.reorder(&[4, 99, 2, 4]);
        assert_eq!(ids(&store), vec![4, 2, 1, 3]);
        assert_eq!(report.ignored, vec![99, 4]);
        assert_eq!(report.reappended, vec![1, 3]);
    }

    #[test]
    fn failed_save_keeps_change_and_is_reported_once() {
        let (mut store, blobs) = store_with(&[(1, "a", false)]);
        blobs.fail_writes(true);
        store.toggle_done(1).unwrap();
        assert!(store.get(1).unwrap().done);
        let failure = store.take_save_failure().unwrap();
        assert_eq!(decode(&failure.blob).unwrap(), store.all());
        assert!(failure.first_in_run);
        assert!(store.take_save_failure().is_none());
    }

    #[test]
    fn failure_runs_are_tracked_until_a_save_succeeds() {
        let (mut store, blobs) = store_with(&[(1, "a", false)]);
        assert!(store.unsaved_blob().is_none());

        blobs.fail_writes(true);
        store.toggle_done(1).unwrap();
        assert!(store.take_save_failure().unwrap().first_in_run);
        store.toggle_done(1).unwrap();
        assert!(!store.take_save_failure().unwrap().first_in_run);
        let unsaved = store.unsaved_blob().unwrap();
        assert_eq!(decode(&unsaved).unwrap(), store.all());

        blobs.fail_writes(false);
        store.add("b").unwrap();
        assert!(store.take_save_failure().is_none());
        assert!(store.unsaved_blob().is_none());

        blobs.fail_writes(true);
        store.add("c").unwrap();
        assert!(store.take_save_failure().unwrap().first_in_run);
    }

    #[test]
    fn persisted_blob_tracks_every_operation() {
        let (mut store, blobs) = store_with(&[]);
        let a = store.add("a").unwrap().id;
        assert_eq!(persisted(&blobs), store.all());
        let b = store.add("b").unwrap().id;
        assert_eq!(persisted(&blobs), store.all());
        store.toggle_done(a).unwrap();
        assert_eq!(persisted(&blobs), store.all());
        store.reorder(&[b, a]);
        assert_eq!(persisted(&blobs), store.all());
        store.update(b, "bee").unwrap();
        assert_eq!(persisted(&blobs), store.all());
        store.remove(a).unwrap();
        assert_eq!(persisted(&blobs), store.all());
        assert_eq!(store.all(), &[Item::new(b, "bee")]);
    }
}
