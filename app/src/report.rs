// In app/src/report.rs

use api_client::RawFrame;
use core_types::{PriceTable, SignalTable};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "NaN".to_string(), |v| format!("{v:.4}"))
}

/// Prints the first `rows` bars of a price table.
pub fn print_price_table(table: &PriceTable, rows: usize) {
    println!(
        "{:<17} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    let at = |col: &Option<Vec<f64>>, i: usize| col.as_ref().and_then(|v| v.get(i).copied());
    for i in 0..rows.min(table.len()) {
        println!(
            "{:<17} {:>12} {:>12} {:>12} {:>12} {:>14}",
            table.index[i].format(TIME_FORMAT),
            cell(at(&table.open, i)),
            cell(at(&table.high, i)),
            cell(at(&table.low, i)),
            cell(table.close.get(i).copied()),
            at(&table.volume, i).map_or_else(|| "NaN".to_string(), |v| format!("{v:.0}")),
        );
    }
    println!("[{} rows]", table.len());

    let missing = table.missing_columns();
    if !missing.is_empty() {
        println!("Missing columns: {}", missing.join(", "));
    }
}

/// Prints the leading rows of an unnormalized frame.
pub fn print_raw_head(frame: &RawFrame, rows: usize) {
    let header: Vec<String> = frame.columns.iter().map(|c| format!("{:>12}", c.name())).collect();
    println!("{:<17} {}", "Date", header.join(" "));
    for i in 0..rows.min(frame.len()) {
        let values: Vec<String> = frame
            .columns
            .iter()
            .map(|c| format!("{:>12}", cell(c.values.get(i).copied().flatten())))
            .collect();
        println!("{:<17} {}", frame.index[i].format(TIME_FORMAT), values.join(" "));
    }
}

/// Prints the signal table, or only its crossover rows.
pub fn print_signals(signals: &SignalTable, crossovers_only: bool) {
    println!(
        "{:<17} {:>12} {:>12} {:>12} {:>7} {:>10}",
        "Date", "Price", "Short MA", "Long MA", "Signal", "Position"
    );
    for row in signals.iter().filter(|row| !crossovers_only || row.positions != 0.0) {
        let marker = match row.positions {
            p if p > 0.0 => "  BUY",
            p if p < 0.0 => "  SELL",
            _ => "",
        };
        println!(
            "{:<17} {:>12.4} {:>12.4} {:>12.4} {:>7.1} {:>10.1}{}",
            row.timestamp.format(TIME_FORMAT),
            row.price,
            row.short_mavg,
            row.long_mavg,
            row.signal,
            row.positions,
            marker
        );
    }

    if let Some(latest) = signals.latest() {
        let state = if latest.signal > 0.0 { "LONG" } else { "FLAT" };
        println!(
            "[{} rows, {} crossovers, currently {}]",
            signals.len(),
            signals.crossovers().count(),
            state
        );
    }
}
