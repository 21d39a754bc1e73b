// In crates/core-types/src/lib.rs

pub mod error;
pub mod table;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use error::{Error, Result};
pub use table::{PriceBar, PriceTable, SignalRow, SignalTable};
pub use types::{Interval, Timeframe};
