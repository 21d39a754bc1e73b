// In crates/api-client/src/frame.rs

use chrono::{DateTime, Utc};
use core_types::PriceTable;

use crate::{Error, Result};

pub const OPEN: &str = "Open";
pub const HIGH: &str = "High";
pub const LOW: &str = "Low";
pub const CLOSE: &str = "Close";
pub const ADJ_CLOSE: &str = "Adj Close";
pub const VOLUME: &str = "Volume";

/// Columns a usable table needs, besides Close.
const OTHER_REQUIRED: [&str; 4] = [OPEN, HIGH, LOW, VOLUME];

/// A provider column. `header` has one entry for flat tables and two
/// (price field, ticker) when several instruments share one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: Vec<String>,
    pub values: Vec<Option<f64>>,
}

impl Column {
    pub fn new(name: &str, values: Vec<Option<f64>>) -> Self {
        Self {
            header: vec![name.to_string()],
            values,
        }
    }

    pub fn nested(field: &str, ticker: &str, values: Vec<Option<f64>>) -> Self {
        Self {
            header: vec![field.to_string(), ticker.to_string()],
            values,
        }
    }

    /// The first header level.
    pub fn name(&self) -> &str {
        self.header.first().map(String::as_str).unwrap_or_default()
    }
}

/// A provider table before normalization: nullable cells, loose columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawFrame {
    pub index: Vec<DateTime<Utc>>,
    pub columns: Vec<Column>,
}

impl RawFrame {
    /// True when there are no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty() || self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_multi_level(&self) -> bool {
        self.columns.iter().any(|c| c.header.len() > 1)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// First column whose (flat) name matches.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    fn level_contains(&self, level: usize, name: &str) -> bool {
        self.columns
            .iter()
            .any(|c| c.header.get(level).is_some_and(|h| h == name))
    }

    /// Collapses two-level headers onto whichever level holds "Close".
    ///
    /// Level 0 is checked before level 1; when neither has it, level 0 is
    /// kept. Flat frames are left unchanged.
    pub fn flatten_columns(&mut self) {
        if !self.is_multi_level() {
            return;
        }
        let level = if self.level_contains(0, CLOSE) {
            0
        } else if self.level_contains(1, CLOSE) {
            1
        } else {
            tracing::warn!(
                columns = ?self.columns.iter().map(|c| &c.header).collect::<Vec<_>>(),
                "No header level contains 'Close'; keeping the first level."
            );
            0
        };
        self.keep_level(level);
    }

    /// Collapses two-level headers onto the first level.
    pub fn flatten_to_first_level(&mut self) {
        if self.is_multi_level() {
            self.keep_level(0);
        }
    }

    fn keep_level(&mut self, level: usize) {
        for column in &mut self.columns {
            let name = column
                .header
                .get(level)
                .or_else(|| column.header.first())
                .cloned()
                .unwrap_or_default();
            column.header = vec![name];
        }
    }

    /// Aliases "Adj Close" as "Close" when only the former was delivered.
    /// Returns whether the alias was added.
    pub fn repair_close(&mut self) -> bool {
        if self.column(CLOSE).is_some() {
            return false;
        }
        let Some(adjusted) = self.column(ADJ_CLOSE).cloned() else {
            return false;
        };
        self.columns.push(Column::new(CLOSE, adjusted.values));
        true
    }

    /// Open/High/Low/Volume columns that are absent.
    pub fn missing_columns(&self) -> Vec<&'static str> {
        OTHER_REQUIRED
            .into_iter()
            .filter(|name| self.column(name).is_none())
            .collect()
    }

    /// Drops every row with a null or NaN in any column.
    pub fn drop_nulls(&mut self) {
        let keep: Vec<bool> = (0..self.index.len())
            .map(|row| {
                self.columns.iter().all(|c| {
                    c.values
                        .get(row)
                        .copied()
                        .flatten()
                        .is_some_and(|v| !v.is_nan())
                })
            })
            .collect();

        let mut row = 0;
        self.index.retain(|_| {
            row += 1;
            keep[row - 1]
        });
        for column in &mut self.columns {
            let mut row = 0;
            column.values.truncate(keep.len());
            column.values.retain(|_| {
                row += 1;
                keep[row - 1]
            });
        }
    }

    /// Converts a pruned frame into a `PriceTable`.
    ///
    /// Close is mandatory; the other price columns are carried when present.
    pub fn to_price_table(&self) -> Result<PriceTable> {
        let take = |name: &str| {
            self.column(name).map(|c| {
                (0..self.index.len())
                    .map(|row| c.values.get(row).copied().flatten().unwrap_or(f64::NAN))
                    .collect::<Vec<f64>>()
            })
        };

        Ok(PriceTable {
            index: self.index.clone(),
            open: take(OPEN),
            high: take(HIGH),
            low: take(LOW),
            close: take(CLOSE).ok_or(Error::MissingColumn(CLOSE))?,
            volume: take(VOLUME),
        })
    }
}
