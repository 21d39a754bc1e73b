// In crates/strategies/src/types.rs

use serde::{Deserialize, Serialize};

pub const DEFAULT_SHORT_WINDOW: usize = 5;
pub const DEFAULT_LONG_WINDOW: usize = 20;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct MACrossoverSettings {
    /// Bars in the fast moving average; also the length of the warm-up.
    #[serde(default = "default_short_window")]
    pub short_window: usize,
    /// Bars in the slow moving average; shorter histories produce no signals.
    #[serde(default = "default_long_window")]
    pub long_window: usize,
}

impl Default for MACrossoverSettings {
    fn default() -> Self {
        Self {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
        }
    }
}

fn default_short_window() -> usize {
    DEFAULT_SHORT_WINDOW
}

fn default_long_window() -> usize {
    DEFAULT_LONG_WINDOW
}
