// In app/src/main.rs

use anyhow::Result;
use api_client::{
    DEFAULT_INTERVAL, DEFAULT_RATE_TIMEFRAME, MarketData, MarketDataProvider, Period,
    ProviderInterval, ProviderQuery, YahooClient,
};
use app_config::Settings;
use clap::{Parser, Subcommand};
use strategies::{MACrossover, MACrossoverSettings, Strategy};
use tracing_subscriber::prelude::*;

mod report;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Price history, exchange rates and moving-average crossover signals.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Downloads and prints a normalized price table.
    Fetch {
        /// Ticker, bare crypto symbol or company name (e.g., "AAPL", "btc", "nvidia").
        symbol: String,

        /// History window: 1M, 3M, 6M, 1Y, 2Y or 5Y.
        #[arg(short, long)]
        timeframe: String,

        /// Bar size: minute, 5min, 15min, 30min, hour, day, week or month.
        #[arg(short, long, default_value = DEFAULT_INTERVAL)]
        interval: String,

        /// Number of leading rows to print.
        #[arg(long, default_value_t = 10)]
        rows: usize,

        /// Print the whole table as JSON instead.
        #[arg(long)]
        json: bool,
    },

    /// Prints the most recent High for a symbol.
    Rate {
        symbol: String,

        #[arg(short, long, default_value = DEFAULT_RATE_TIMEFRAME)]
        timeframe: String,

        #[arg(short, long, default_value = DEFAULT_INTERVAL)]
        interval: String,
    },

    /// Downloads prices and runs the moving-average crossover over them.
    Signals {
        symbol: String,

        #[arg(short, long)]
        timeframe: String,

        #[arg(short, long, default_value = DEFAULT_INTERVAL)]
        interval: String,

        /// Overrides `strategy.short_window` from the settings.
        #[arg(long)]
        short_window: Option<usize>,

        /// Overrides `strategy.long_window` from the settings.
        #[arg(long)]
        long_window: Option<usize>,

        /// Only print rows where the position changes.
        #[arg(long)]
        crossovers_only: bool,

        #[arg(long)]
        json: bool,
    },

    /// Checks the provider connection with a one-month daily NVDA download.
    Smoke,
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let settings = app_config::load_settings()?;
    init_tracing(&settings);

    // Parse command-line arguments.
    let cli = Cli::parse();

    let client = api_client::new(&settings.provider)?;
    tracing::info!(
        provider = client.name(),
        base_url = %client.base_url,
        "Provider client ready."
    );

    // Match on the parsed command and call the appropriate handler.
    match cli.command {
        Commands::Fetch { symbol, timeframe, interval, rows, json } => {
            let market = MarketData::new(client);
            handle_fetch(&market, &symbol, &timeframe, &interval, rows, json).await?;
        }
        Commands::Rate { symbol, timeframe, interval } => {
            let market = MarketData::new(client);
            let rate = market.fetch_exchange_rate(&symbol, &timeframe, &interval).await?;
            println!("{symbol}: {rate}");
        }
        Commands::Signals {
            symbol,
            timeframe,
            interval,
            short_window,
            long_window,
            crossovers_only,
            json,
        } => {
            let strategy_settings = MACrossoverSettings {
                short_window: short_window.unwrap_or(settings.strategy.short_window),
                long_window: long_window.unwrap_or(settings.strategy.long_window),
            };
            let market = MarketData::new(client);
            handle_signals(
                &market,
                strategy_settings,
                &symbol,
                &timeframe,
                &interval,
                crossovers_only,
                json,
            )
            .await?;
        }
        Commands::Smoke => {
            handle_smoke(&client).await;
        }
    }

    Ok(())
}

/// Installs the fmt subscriber at the configured level, keeping HTTP internals quiet.
fn init_tracing(settings: &Settings) {
    let level = settings
        .app
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::filter::Targets::new()
            .with_target("hyper_util", tracing::Level::WARN)
            .with_target("reqwest", tracing::Level::WARN)
            .with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();
}

// --- "Fetch" Subcommand Logic ---

async fn handle_fetch(
    market: &MarketData<YahooClient>,
    symbol: &str,
    timeframe: &str,
    interval: &str,
    rows: usize,
    json: bool,
) -> Result<()> {
    let table = market.fetch_stock_data(symbol, timeframe, interval).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        report::print_price_table(&table, rows);
    }
    Ok(())
}

// --- "Signals" Subcommand Logic ---

async fn handle_signals(
    market: &MarketData<YahooClient>,
    settings: MACrossoverSettings,
    symbol: &str,
    timeframe: &str,
    interval: &str,
    crossovers_only: bool,
    json: bool,
) -> Result<()> {
    // --- 1. Load Data ---
    let table = market.fetch_stock_data(symbol, timeframe, interval).await?;
    tracing::info!(rows = table.len(), "Loaded price data.");

    // --- 2. Run the Strategy ---
    let strategy = MACrossover::new(settings);
    let signals = strategy.generate(&table)?;
    tracing::info!(
        strategy = strategy.name(),
        short_window = settings.short_window,
        long_window = settings.long_window,
        crossovers = signals.crossovers().count(),
        "Signals generated."
    );

    // --- 3. Print ---
    if json {
        let rows: Vec<_> = if crossovers_only {
            signals.crossovers().collect()
        } else {
            signals.iter().collect()
        };
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        report::print_signals(&signals, crossovers_only);
    }
    Ok(())
}

// --- "Smoke" Subcommand Logic ---

/// Talks to the provider directly, bypassing resolution and normalization.
/// Problems are printed rather than returned.
async fn handle_smoke(client: &YahooClient) {
    let query = ProviderQuery {
        symbol: "NVDA".to_string(),
        period: Period::OneMonth,
        interval: ProviderInterval::OneDay,
    };
    println!("Testing {} download for {}...", client.name(), query.symbol);

    match client.download(&query).await {
        Ok(frame) if frame.is_empty() => println!("Error: Downloaded data is empty."),
        Ok(frame) => {
            println!("Success! Data shape: ({}, {})", frame.len(), frame.columns.len());
            report::print_raw_head(&frame, 5);
        }
        Err(e) => println!("Error: {} download failed: {e}", client.name()),
    }
}
