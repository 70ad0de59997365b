use std::collections::HashMap;
use std::time::Duration;

use crate::palette::{DEFAULT_FAVORITES_CAPACITY, DEFAULT_HISTORY_CAPACITY};

pub const MAX_LIST_CAPACITY: usize = 50;

/// Picker settings that can be customized via Rhai config
#[derive(Debug, Clone)]
pub struct Settings {
    // Display
    pub theme: String,
    pub show_color_name: bool,
    pub toast_duration_ms: u64,

    // Lists
    pub history_capacity: usize,
    pub favorites_capacity: usize,

    // Picking
    pub sampler: String,
    pub sampler_args: Vec<String>,
    pub copy_on_pick: bool,

    // Custom keybinds: key notation -> action name
    pub keybinds: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "gruvbox-dark".to_string(),
            show_color_name: true,
            toast_duration_ms: 2000,

            history_capacity: DEFAULT_HISTORY_CAPACITY,
            favorites_capacity: DEFAULT_FAVORITES_CAPACITY,

            sampler: "xcolor".to_string(),
            sampler_args: Vec::new(),
            copy_on_pick: true,

            keybinds: HashMap::new(),
        }
    }
}

impl Settings {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn clamp_capacity(capacity: i64) -> usize {
        capacity.clamp(1, MAX_LIST_CAPACITY as i64) as usize
    }
}
