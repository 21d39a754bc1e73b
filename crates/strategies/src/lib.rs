// In crates/strategies/src/lib.rs

use core_types::{PriceTable, SignalTable};
pub mod error;
pub mod ma_crossover;
pub mod types;

pub use error::{Error, Result};
pub use ma_crossover::{MACrossover, momentum_trading_strategy};
pub use types::{DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW, MACrossoverSettings};

/// The universal interface for a signal generator.
///
/// A generator turns a complete price history into a table of signals aligned
/// row-for-row with the input. It keeps no state between calls.
pub trait Strategy {
    /// The name of the strategy.
    fn name(&self) -> &'static str;

    fn generate(&self, data: &PriceTable) -> Result<SignalTable>;
}
