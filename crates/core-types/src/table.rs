// In crates/core-types/src/table.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single fully-populated OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A normalized price series, stored column by column.
///
/// `close` is always present. The other fields are `None` only when the
/// provider did not return that column at all; every present column has the
/// same length as `index` and holds no nulls.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PriceTable {
    /// Bar timestamps, ascending as delivered by the provider.
    pub index: Vec<DateTime<Utc>>,
    pub open: Option<Vec<f64>>,
    pub high: Option<Vec<f64>>,
    pub low: Option<Vec<f64>>,
    pub close: Vec<f64>,
    pub volume: Option<Vec<f64>>,
}

impl PriceTable {
    /// Builds a table where all five columns are present.
    pub fn from_bars(bars: &[PriceBar]) -> Self {
        Self {
            index: bars.iter().map(|b| b.timestamp).collect(),
            open: Some(bars.iter().map(|b| b.open).collect()),
            high: Some(bars.iter().map(|b| b.high).collect()),
            low: Some(bars.iter().map(|b| b.low).collect()),
            close: bars.iter().map(|b| b.close).collect(),
            volume: Some(bars.iter().map(|b| b.volume).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Names of the OHLCV columns the provider did not deliver.
    pub fn missing_columns(&self) -> Vec<&'static str> {
        [
            ("Open", self.open.is_none()),
            ("High", self.high.is_none()),
            ("Low", self.low.is_none()),
            ("Volume", self.volume.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
    }

    /// Returns the bar at `i` if it exists and every column is present.
    pub fn bar(&self, i: usize) -> Option<PriceBar> {
        Some(PriceBar {
            timestamp: *self.index.get(i)?,
            open: *self.open.as_ref()?.get(i)?,
            high: *self.high.as_ref()?.get(i)?,
            low: *self.low.as_ref()?.get(i)?,
            close: *self.close.get(i)?,
            volume: *self.volume.as_ref()?.get(i)?,
        })
    }

    /// The High of the most recent bar.
    pub fn last_high(&self) -> Option<f64> {
        self.high.as_ref()?.last().copied()
    }

    /// Keeps only the first `n` rows.
    pub fn head(&self, n: usize) -> PriceTable {
        let n = n.min(self.len());
        let cut = |col: &Option<Vec<f64>>| col.as_ref().map(|v| v[..n].to_vec());
        PriceTable {
            index: self.index[..n].to_vec(),
            open: cut(&self.open),
            high: cut(&self.high),
            low: cut(&self.low),
            close: self.close[..n].to_vec(),
            volume: cut(&self.volume),
        }
    }
}

/// One row of crossover output, aligned to a `PriceTable` row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalRow {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub short_mavg: f64,
    pub long_mavg: f64,
    /// 1.0 while the short average sits above the long one, else 0.0.
    pub signal: f64,
    /// +1.0 on entry (golden cross), -1.0 on exit (death cross), else 0.0.
    pub positions: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SignalTable {
    pub rows: Vec<SignalRow>,
}

impl SignalTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignalRow> {
        self.rows.iter()
    }

    /// Rows where the position changes.
    pub fn crossovers(&self) -> impl Iterator<Item = &SignalRow> {
        self.rows.iter().filter(|row| row.positions != 0.0)
    }

    pub fn latest(&self) -> Option<&SignalRow> {
        self.rows.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            open: close - 1.0,
            high: close + 2.0,
            low: close - 2.0,
            close,
            volume: 1_000.0,
        }
    }

    #[test]
    fn from_bars_keeps_every_column() {
        let table = PriceTable::from_bars(&[bar(1, 10.0), bar(2, 11.0)]);
        assert_eq!(table.len(), 2);
        assert!(table.missing_columns().is_empty());
        assert_eq!(table.bar(1), Some(bar(2, 11.0)));
        assert_eq!(table.last_high(), Some(13.0));
    }

    #[test]
    fn missing_columns_are_reported() {
        let mut table = PriceTable::from_bars(&[bar(1, 10.0)]);
        table.volume = None;
        table.high = None;
        assert_eq!(table.missing_columns(), vec!["High", "Volume"]);
        assert_eq!(table.bar(0), None);
        assert_eq!(table.last_high(), None);
    }

    #[test]
    fn head_truncates_all_columns() {
        let table = PriceTable::from_bars(&[bar(1, 10.0), bar(2, 11.0), bar(3, 12.0)]);
        let head = table.head(2);
        assert_eq!(head.len(), 2);
        assert_eq!(head.close, vec![10.0, 11.0]);
        assert_eq!(head.high.as_deref(), Some(&[12.0, 13.0][..]));
        assert_eq!(table.head(10).len(), 3);
    }
}
