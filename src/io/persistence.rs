use std::collections::HashSet;

use crate::io::blob_store::{BlobStore, StoreError};
use crate::model::Item;

/// Key the item list is stored under
pub const TASKS_KEY: &str = "tasks";

/// Loads and saves the whole ordered item list as one JSON blob.
pub struct Persistence {
    blobs: Box<dyn BlobStore>,
    key: String,
}

impl Persistence {
    pub fn new(blobs: impl BlobStore + 'static) -> Self {
        Persistence {
            blobs: Box::new(blobs),
            key: TASKS_KEY.to_string(),
        }
    }

    /// Read the stored list. Missing, unreadable or unparseable content
    /// yields an empty list. Blank entries and repeated ids are dropped.
    pub fn load(&self) -> Vec<Item> {
        let raw = match self.blobs.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored items");
                return Vec::new();
            }
        };
        match decode(&raw) {
            Ok(items) => sanitize(items),
            Err(e) => {
                tracing::warn!(error = %e, "stored items are not valid JSON, starting empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the stored list with `items`
    pub fn save(&mut self, items: &[Item]) -> Result<(), StoreError> {
        let blob = encode(items)?;
        self.blobs.set(&self.key, &blob)
    }
}

/// Serialize items in the stored blob format
pub fn encode(items: &[Item]) -> Result<String, StoreError> {
    Ok(serde_json::to_string(items)?)
}

/// Parse the stored blob format. `null` is treated as an empty list.
pub fn decode(raw: &str) -> Result<Vec<Item>, serde_json::Error> {
    let items: Option<Vec<Item>> = serde_json::from_str(raw)?;
    Ok(items.unwrap_or_default())
}

/// Drop entries that would break the list's invariants: whitespace-only
/// text, and any id already seen earlier in the list.
fn sanitize(items: Vec<Item>) -> Vec<Item> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter_map(|mut item| {
            let trimmed = item.text.trim().to_string();
            if trimmed.is_empty() {
                tracing::warn!(id = item.id, "dropping stored item with empty text");
                return None;
            }
            if !seen.insert(item.id) {
                tracing::warn!(
                    id = item.id,
                    text = %item.text,
                    "dropping stored item with duplicate id"
                );
                return None;
            }
            item.text = trimmed;
            Some(item)
        })
        .collect()
}
