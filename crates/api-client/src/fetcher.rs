// In crates/api-client/src/fetcher.rs

use core_types::{PriceTable, Timeframe};

use crate::frame::{HIGH, RawFrame};
use crate::provider::MarketDataProvider;
use crate::query::{self, ProviderQuery, ResolvedQuery};
use crate::{DataUnavailableError, Error, Result};

/// Interval used when the caller does not pick one.
pub const DEFAULT_INTERVAL: &str = "hour";
/// Timeframe used for exchange-rate lookups when the caller does not pick one.
pub const DEFAULT_RATE_TIMEFRAME: &str = "1M";

/// Days of intraday history the provider keeps.
const INTRADAY_DAY_LIMIT: u32 = 60;

/// Price-series and exchange-rate retrieval on top of a provider.
///
/// Every call resolves its parameters from scratch and issues its requests
/// one after the other; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct MarketData<P> {
    provider: P,
}

impl<P: MarketDataProvider> MarketData<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetches a normalized OHLCV table.
    ///
    /// An empty first answer triggers exactly one retry with daily bars over
    /// the uncapped period. Failures of that retry are logged and ignored.
    pub async fn fetch_stock_data(
        &self,
        symbol: &str,
        timeframe: &str,
        interval: &str,
    ) -> std::result::Result<PriceTable, DataUnavailableError> {
        let query = query::resolve(symbol, timeframe, interval);
        self.load_series(&query)
            .await
            .map_err(|source| DataUnavailableError::new(interval, &query.symbol, source))
    }

    /// Fetches the High of the most recent bar.
    ///
    /// Unlike `fetch_stock_data` there is no retry and no Close repair, and
    /// the timeframe must be one of the recognized labels.
    pub async fn fetch_exchange_rate(
        &self,
        symbol: &str,
        timeframe: &str,
        interval: &str,
    ) -> std::result::Result<f64, DataUnavailableError> {
        // The timeframe is validated before the symbol is resolved.
        let days = timeframe
            .parse::<Timeframe>()
            .map_err(|e| DataUnavailableError::new(interval, symbol, e.into()))?
            .days();

        let query = query::resolve(symbol, timeframe, interval);
        if query.interval.is_intraday() && days > INTRADAY_DAY_LIMIT {
            tracing::warn!(
                interval = %query.interval,
                days,
                limit = INTRADAY_DAY_LIMIT,
                "Limiting intraday data to the provider's history window."
            );
        }

        self.load_rate(&query)
            .await
            .map_err(|source| DataUnavailableError::new(interval, &query.symbol, source))
    }

    async fn load_series(&self, query: &ResolvedQuery) -> Result<PriceTable> {
        // --- 1. Primary request ---
        let mut frame = self.download(&query.primary()).await?;

        // --- 2. One best-effort retry on daily bars ---
        if frame.is_empty() {
            let fallback = query.fallback();
            tracing::warn!(
                symbol = %query.symbol,
                interval = %query.interval,
                "No data returned. Retrying with '1d' interval."
            );
            match self.provider.download(&fallback).await {
                Ok(retried) => frame = retried,
                Err(e) => tracing::warn!(error = %e, "Fallback download failed."),
            }

            if frame.is_empty() {
                return Err(Error::NoData(format!(
                    "No data found for symbol {}. Please ensure you are using the correct ticker symbol (e.g., NVDA for Nvidia, AAPL for Apple).",
                    query.symbol
                )));
            }
        }

        // --- 3. Column layout ---
        frame.flatten_columns();
        if frame.repair_close() {
            tracing::info!(symbol = %query.symbol, "Using 'Adj Close' as 'Close'.");
        }
        let missing = frame.missing_columns();
        if !missing.is_empty() {
            tracing::warn!(symbol = %query.symbol, ?missing, "Missing columns in provider data.");
        }

        // --- 4. Null pruning ---
        frame.drop_nulls();
        if frame.is_empty() {
            return Err(Error::NoData(format!(
                "No complete rows for symbol {} after removing nulls",
                query.symbol
            )));
        }

        let table = frame.to_price_table()?;
        tracing::debug!(symbol = %query.symbol, rows = table.len(), "Price data ready.");
        Ok(table)
    }

    async fn load_rate(&self, query: &ResolvedQuery) -> Result<f64> {
        let mut frame = self.download(&query.primary()).await?;
        if frame.is_empty() {
            return Err(Error::NoData(format!(
                "No data found for symbol {} with {} interval",
                query.symbol, query.interval
            )));
        }

        frame.flatten_to_first_level();
        frame.drop_nulls();

        let high = frame.column(HIGH).ok_or(Error::MissingColumn(HIGH))?;
        high.values
            .last()
            .copied()
            .flatten()
            .ok_or_else(|| Error::NoData(format!("No complete rows for symbol {}", query.symbol)))
    }

    /// Issues one request; any provider error is fatal for the caller.
    async fn download(&self, request: &ProviderQuery) -> Result<RawFrame> {
        tracing::info!(
            symbol = %request.symbol,
            period = %request.period,
            interval = %request.interval,
            "Downloading data."
        );
        self.provider.download(request).await.map_err(|e| {
            tracing::error!(error = %e, provider = self.provider.name(), "Download failed.");
            Error::DownloadFailed {
                provider: self.provider.name(),
                source: Box::new(e),
            }
        })
    }
}
