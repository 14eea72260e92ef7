pub mod confirm;
pub mod item_store;
pub mod reconcile;
pub mod search;
