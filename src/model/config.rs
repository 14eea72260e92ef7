use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub gestures: GestureConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// "#RRGGBB" overrides keyed by theme slot name
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Net horizontal drag distance that turns a drag into an edit (right)
    /// or delete (left) swipe
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold_px: i32,
    /// Terminal cell size used to convert mouse cells into pixels
    #[serde(default = "default_cell_width")]
    pub cell_width_px: i32,
    #[serde(default = "default_cell_height")]
    pub cell_height_px: i32,
    /// How long the empty-input alert stays visible
    #[serde(default = "default_alert_ms")]
    pub alert_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            swipe_threshold_px: default_swipe_threshold(),
            cell_width_px: default_cell_width(),
            cell_height_px: default_cell_height(),
            alert_ms: default_alert_ms(),
        }
    }
}

impl GestureConfig {
    /// Name of the first setting that would break hit-testing or swipes
    pub fn invalid_field(&self) -> Option<&'static str> {
        if self.cell_width_px < 1 {
            Some("cell_width_px")
        } else if self.cell_height_px < 1 {
            Some("cell_height_px")
        } else if self.swipe_threshold_px < 0 {
            Some("swipe_threshold_px")
        } else if self.alert_ms == 0 {
            Some("alert_ms")
        } else {
            None
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_swipe_threshold() -> i32 {
    100
}

fn default_cell_width() -> i32 {
    8
}

fn default_cell_height() -> i32 {
    16
}

fn default_alert_ms() -> u64 {
    2000
}
