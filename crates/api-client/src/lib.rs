// In crates/api-client/src/lib.rs

use std::time::Duration;

use app_config::ProviderSettings;
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Url;

pub mod error;
pub mod fetcher;
pub mod frame;
pub mod provider;
pub mod query;
pub mod types;

// Re-export public types
pub use error::{DataUnavailableError, Error, Result};
pub use fetcher::{DEFAULT_INTERVAL, DEFAULT_RATE_TIMEFRAME, MarketData};
pub use frame::{Column, RawFrame};
pub use provider::MarketDataProvider;
pub use query::{Period, ProviderInterval, ProviderQuery, ResolvedQuery};
pub use types::*;

use crate::frame::{ADJ_CLOSE, CLOSE, HIGH, LOW, OPEN, VOLUME};

/// Chart error code the endpoint uses for unknown or delisted tickers.
const NOT_FOUND_CODE: &str = "Not Found";

impl YahooClient {
    /// Constructs a new YahooClient from ProviderSettings.
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(settings.user_agent.clone());
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        let base_url = Url::parse(settings.base_url.trim_end_matches('/')).map_err(|e| {
            Error::ClientBuildError(format!("invalid base URL '{}': {e}", settings.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::ClientBuildError(format!(
                "base URL '{}' cannot take a path",
                settings.base_url
            )));
        }

        Ok(YahooClient { http_client, base_url })
    }

    /// Appends `symbol` to the chart endpoint as one percent-encoded path
    /// segment, so `/`, `?` and `#` stay part of the ticker.
    pub fn chart_url(&self, symbol: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::ClientBuildError(format!("base URL '{}' cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .push(symbol);
        Ok(url)
    }

    /// Fetches historical bars for one ticker.
    ///
    /// This corresponds to the `GET /v8/finance/chart/{symbol}` endpoint.
    pub async fn get_chart(&self, query: &ProviderQuery) -> Result<RawFrame> {
        let url = self.chart_url(&query.symbol)?;

        let response = self
            .http_client
            .get(url)
            .query(&[
                ("range", query.period.code()),
                ("interval", query.interval.code()),
                ("includeAdjustedClose", "true"),
            ])
            .send()
            .await
            .map_err(Error::RequestFailed)?;

        let status = response.status();
        let text = response.text().await.map_err(Error::RequestFailed)?;

        // Error statuses usually still carry a chart error object; only fall
        // back to the status line when the body is not a chart payload.
        parse_chart(&query.symbol, &text).map_err(|e| match e {
            Error::DeserializationFailed(_) if !status.is_success() => Error::ApiError {
                code: status.as_u16().to_string(),
                msg: text.chars().take(200).collect(),
            },
            other => other,
        })
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    fn name(&self) -> &'static str {
        "Yahoo Finance"
    }

    async fn download(&self, query: &ProviderQuery) -> Result<RawFrame> {
        self.get_chart(query).await
    }
}

/// Converts a chart payload into a flat `RawFrame`.
///
/// Columns come out in the order Open, High, Low, Close, Adj Close (when
/// delivered), Volume. An unknown ticker yields an empty frame.
pub fn parse_chart(symbol: &str, body: &str) -> Result<RawFrame> {
    let response: ChartResponse = serde_json::from_str(body)?;

    if let Some(err) = response.chart.error {
        let msg = err.description.unwrap_or_default();
        if err.code == NOT_FOUND_CODE {
            tracing::warn!(symbol, reason = %msg, "Provider has no data for symbol.");
            return Ok(RawFrame::default());
        }
        return Err(Error::ApiError { code: err.code, msg });
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(RawFrame::default());
    };

    let index = result
        .timestamp
        .unwrap_or_default()
        .into_iter()
        .map(|ts| DateTime::from_timestamp(ts, 0).ok_or(Error::InvalidTimestamp(ts)))
        .collect::<Result<Vec<_>>>()?;

    // Pad or trim every series to the index so rows stay aligned.
    let rows = index.len();
    let align = |values: Vec<Option<f64>>| -> Vec<Option<f64>> {
        (0..rows).map(|i| values.get(i).copied().flatten()).collect()
    };

    let mut indicators = result.indicators;
    let quote = if indicators.quote.is_empty() {
        Quote::default()
    } else {
        indicators.quote.swap_remove(0)
    };

    let mut columns = vec![
        Column::new(OPEN, align(quote.open)),
        Column::new(HIGH, align(quote.high)),
        Column::new(LOW, align(quote.low)),
        Column::new(CLOSE, align(quote.close)),
    ];
    if let Some(adj) = indicators.adjclose.and_then(|a| a.into_iter().next()) {
        columns.push(Column::new(ADJ_CLOSE, align(adj.adjclose)));
    }
    columns.push(Column::new(VOLUME, align(quote.volume)));

    Ok(RawFrame { index, columns })
}

// Free function to allow api_client::new usage
pub fn new(settings: &ProviderSettings) -> Result<YahooClient> {
    YahooClient::new(settings)
}
