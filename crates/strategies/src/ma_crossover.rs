// In crates/strategies/src/ma_crossover.rs

use crate::types::MACrossoverSettings;
use crate::{Error, Result, Strategy};
use core_types::{PriceTable, SignalRow, SignalTable};
use ta::Next;
use ta::indicators::SimpleMovingAverage as Sma;

/// Two simple moving averages over Close, long while the fast one is above.
#[derive(Debug, Clone)]
pub struct MACrossover {
    /// The configuration for this strategy instance.
    settings: MACrossoverSettings,
}

impl MACrossover {
    /// Creates a new `MACrossover` strategy instance from its settings.
    pub fn new(settings: MACrossoverSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &MACrossoverSettings {
        &self.settings
    }
}

impl Strategy for MACrossover {
    fn name(&self) -> &'static str {
        "MACrossover"
    }

    fn generate(&self, data: &PriceTable) -> Result<SignalTable> {
        momentum_trading_strategy(data, self.settings.short_window, self.settings.long_window)
    }
}

/// Builds the crossover signal table for `data`.
///
/// Histories shorter than `long_window` are returned unsmoothed with every
/// signal at zero. Otherwise both averages are running means that use every
/// bar seen so far until the window fills, the first `short_window` signals
/// are forced to zero, and `positions` is the bar-over-bar change of
/// `signal`.
pub fn momentum_trading_strategy(
    data: &PriceTable,
    short_window: usize,
    long_window: usize,
) -> Result<SignalTable> {
    // 1. Not enough history: the strategy abstains.
    if data.len() < long_window {
        tracing::debug!(
            rows = data.len(),
            long_window,
            "History shorter than the long window; emitting flat signals."
        );
        let rows = data
            .index
            .iter()
            .zip(&data.close)
            .map(|(&timestamp, &close)| SignalRow {
                timestamp,
                price: close,
                short_mavg: close,
                long_mavg: close,
                signal: 0.0,
                positions: 0.0,
            })
            .collect();
        return Ok(SignalTable { rows });
    }

    // 2. Initialize the indicators. `ta` rejects a zero period.
    let mut short_sma = Sma::new(short_window).map_err(|_| Error::InvalidWindow {
        name: "short",
        value: short_window,
    })?;
    let mut long_sma = Sma::new(long_window).map_err(|_| Error::InvalidWindow {
        name: "long",
        value: long_window,
    })?;

    // 3. Walk the closes once, deriving signal and position per bar.
    let mut rows = Vec::with_capacity(data.len());
    let mut previous_signal: Option<f64> = None;
    let mut previous_close: Option<f64> = None;
    let mut run_len = 0;

    for (i, (&timestamp, &close)) in data.index.iter().zip(&data.close).enumerate() {
        run_len = if previous_close == Some(close) { run_len + 1 } else { 1 };
        previous_close = Some(close);

        let short_samples = (i + 1).min(short_window);
        let long_samples = (i + 1).min(long_window);
        let short_mavg = settled_mean(short_sma.next(close), close, run_len, short_samples);
        let long_mavg = settled_mean(long_sma.next(close), close, run_len, long_samples);

        // The first `short_window` bars are warm-up regardless of the averages.
        let signal = if i >= short_window && short_mavg > long_mavg {
            1.0
        } else {
            0.0
        };
        let positions = previous_signal.map_or(0.0, |prev| signal - prev);
        previous_signal = Some(signal);

        rows.push(SignalRow {
            timestamp,
            price: close,
            short_mavg,
            long_mavg,
            signal,
            positions,
        });
    }

    Ok(SignalTable { rows })
}

/// `ta` keeps a running sum, so a window holding one repeated close can
/// drift off that close by a rounding error. Such a window averages to the
/// close exactly.
fn settled_mean(running: f64, close: f64, run_len: usize, samples: usize) -> f64 {
    if run_len >= samples { close } else { running }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn table_from_closes(closes: &[f64]) -> PriceTable {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        PriceTable {
            index: (0..closes.len())
                .map(|i| start + Duration::hours(i as i64))
                .collect(),
            close: closes.to_vec(),
            ..PriceTable::default()
        }
    }

    #[test]
    fn short_history_abstains() {
        let closes: Vec<f64> = (0..19).map(|i| 50.0 + (i as f64 * 0.7).sin()).collect();
        let signals = momentum_trading_strategy(&table_from_closes(&closes), 5, 20).unwrap();

        assert_eq!(signals.len(), 19);
        for (row, &close) in signals.iter().zip(&closes) {
            assert_eq!(row.price, close);
            assert_eq!(row.short_mavg, close);
            assert_eq!(row.long_mavg, close);
            assert_eq!(row.signal, 0.0);
            assert_eq!(row.positions, 0.0);
        }
    }

    #[test]
    fn empty_table_gives_empty_signals() {
        let signals = momentum_trading_strategy(&PriceTable::default(), 5, 20).unwrap();
        assert!(signals.is_empty());
    }

    #[test]
    fn rising_prices_enter_once_after_warm_up() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let signals = momentum_trading_strategy(&table_from_closes(&closes), 5, 20).unwrap();

        for row in signals.rows.iter().take(5) {
            assert_eq!(row.signal, 0.0);
        }
        for row in signals.rows.iter().skip(5) {
            assert!(row.short_mavg > row.long_mavg);
            assert_eq!(row.signal, 1.0);
        }

        let entries: Vec<usize> = signals
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.positions == 1.0)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(entries, vec![5]);
        assert_eq!(signals.crossovers().count(), 1);
    }

    #[test]
    fn moving_averages_use_partial_windows() {
        let closes: Vec<f64> = (1..=25).map(|i| i as f64).collect();
        let signals = momentum_trading_strategy(&table_from_closes(&closes), 5, 20).unwrap();

        assert_eq!(signals.rows[0].short_mavg, 1.0);
        assert_eq!(signals.rows[1].long_mavg, 1.5);
        assert_eq!(signals.rows[3].short_mavg, 2.5);
        // Full windows from here on.
        assert_eq!(signals.rows[9].short_mavg, 8.0);
        assert_eq!(signals.rows[24].long_mavg, 15.5);
    }

    #[test]
    fn positions_are_first_difference_of_signal() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + 10.0 * (i as f64 / 6.0).sin())
            .collect();
        let signals = momentum_trading_strategy(&table_from_closes(&closes), 5, 20).unwrap();

        assert_eq!(signals.rows[0].positions, 0.0);
        for pair in signals.rows.windows(2) {
            assert_eq!(pair[1].positions, pair[1].signal - pair[0].signal);
        }
        let total: f64 = signals.iter().map(|row| row.positions).sum();
        assert_eq!(total, signals.latest().unwrap().signal);
    }

    #[test]
    fn rise_then_fall_exits() {
        let mut closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        closes.extend((1..=30).map(|i| 129.0 - 2.0 * i as f64));
        let signals = momentum_trading_strategy(&table_from_closes(&closes), 5, 20).unwrap();

        let events: Vec<f64> = signals.crossovers().map(|row| row.positions).collect();
        assert_eq!(events.first(), Some(&1.0));
        assert!(events.contains(&-1.0));
        assert_eq!(signals.latest().unwrap().signal, 0.0);
    }

    #[test]
    fn flat_prices_tie_and_never_signal() {
        for value in [0.1, 0.3, 0.7, 1.1, 3.3, 7.77, 100.0] {
            let signals = momentum_trading_strategy(&table_from_closes(&[value; 40]), 5, 20).unwrap();

            for row in signals.iter() {
                assert_eq!(row.short_mavg, value);
                assert_eq!(row.long_mavg, value);
                assert_eq!(row.signal, 0.0, "flat {value} went long");
                assert_eq!(row.positions, 0.0);
            }
            assert_eq!(signals.crossovers().count(), 0);
        }
    }

    #[test]
    fn plateau_exits_once_the_long_window_is_flat() {
        let mut closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        closes.extend([130.0; 30]);
        let signals = momentum_trading_strategy(&table_from_closes(&closes), 5, 20).unwrap();

        // The short window is flat after five bars, the long one after twenty.
        assert_eq!(signals.rows[48].signal, 1.0);
        let exit = &signals.rows[49];
        assert_eq!(exit.short_mavg, exit.long_mavg);
        assert_eq!(exit.signal, 0.0);
        assert_eq!(exit.positions, -1.0);

        let events: Vec<f64> = signals.crossovers().map(|row| row.positions).collect();
        assert_eq!(events, vec![1.0, -1.0]);
        assert_eq!(signals.latest().unwrap().signal, 0.0);
    }

    #[test]
    fn zero_window_is_rejected() {
        let closes: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let err = momentum_trading_strategy(&table_from_closes(&closes), 0, 20).unwrap_err();
        assert_eq!(err, Error::InvalidWindow { name: "short", value: 0 });
    }

    #[test]
    fn strategy_uses_its_settings() {
        let strategy = MACrossover::new(MACrossoverSettings { short_window: 2, long_window: 4 });
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0];
        let signals = strategy.generate(&table_from_closes(&closes)).unwrap();
        assert_eq!(strategy.name(), "MACrossover");
        assert_eq!(
            signals.iter().map(|row| row.signal).collect::<Vec<_>>(),
            vec![0.0, 0.0, 1.0, 1.0, 1.0]
        );
    }
}
