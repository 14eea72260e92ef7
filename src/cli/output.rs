use serde::Serialize;

use crate::model::{Item, ItemId};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ItemJson {
    pub id: ItemId,
    pub text: String,
    pub done: bool,
}

impl From<&Item> for ItemJson {
    fn from(item: &Item) -> Self {
        ItemJson {
            id: item.id,
            text: item.text.clone(),
            done: item.done,
        }
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One item as a checklist line: `[x] text`
pub fn format_item_line(item: &Item) -> String {
    let mark = if item.done { 'x' } else { ' ' };
    format!("[{}] {}", mark, item.text)
}
