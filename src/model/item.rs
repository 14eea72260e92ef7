use serde::{Deserialize, Serialize};

/// Item identifier: milliseconds since the epoch at creation, bumped when
/// needed so ids stay strictly increasing within a store.
pub type ItemId = u64;

/// A single to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Display text, always non-empty after trimming
    pub text: String,
    pub done: bool,
}

impl Item {
    pub fn new(id: ItemId, text: impl Into<String>) -> Self {
        Item {
            id,
            text: text.into(),
            done: false,
        }
    }
}

/// The three per-item actions shown next to each row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    Complete,
    Edit,
    Delete,
}

impl ItemAction {
    pub const ALL: [ItemAction; 3] = [ItemAction::Complete, ItemAction::Edit, ItemAction::Delete];

    /// Glyph drawn for the action in the row's action strip
    pub fn glyph(self) -> char {
        match self {
            ItemAction::Complete => '\u{2713}',
            ItemAction::Edit => '\u{270E}',
            ItemAction::Delete => '\u{2717}',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ItemAction::Complete => "complete",
            ItemAction::Edit => "edit",
            ItemAction::Delete => "delete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_object() {
        let item = Item {
            id: 7,
            text: "buy milk".into(),
            done: true,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"id":7,"text":"buy milk","done":true}"#);
    }

    #[test]
    fn new_item_is_not_done() {
        let item = Item::new(1, "a");
        assert!(!item.done);
        assert_eq!(item.text, "a");
    }
}
