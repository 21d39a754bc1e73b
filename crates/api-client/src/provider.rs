// In crates/api-client/src/provider.rs

use async_trait::async_trait;

use crate::Result;
use crate::frame::RawFrame;
use crate::query::ProviderQuery;

/// The universal interface for a market-data source.
///
/// A provider answers one (symbol, period, interval) query with a raw table.
/// An unknown symbol or an empty range should come back as an empty frame;
/// `Err` is reserved for transport and protocol failures.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable provider name used in error messages.
    fn name(&self) -> &'static str;

    async fn download(&self, query: &ProviderQuery) -> Result<RawFrame>;
}
