// In crates/api-client/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to build the API client: {0}")]
    ClientBuildError(String),
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),
    #[error("API error: code {code}, msg: {msg}")]
    ApiError { code: String, msg: String },
    #[error("Invalid timestamp {0} in provider response")]
    InvalidTimestamp(i64),
    #[error("Failed to download data from {provider}: {source}")]
    DownloadFailed {
        provider: &'static str,
        source: Box<Error>,
    },
    #[error("{0}")]
    NoData(String),
    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error(transparent)]
    InvalidQuery(#[from] core_types::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The only error the fetchers hand back to callers.
///
/// Whatever went wrong underneath is kept as the source; the message names
/// the requested interval and the resolved symbol.
#[derive(Error, Debug)]
#[error("Error fetching {interval} data for {symbol}: {source}")]
pub struct DataUnavailableError {
    pub interval: String,
    pub symbol: String,
    pub source: Error,
}

impl DataUnavailableError {
    pub fn new(interval: &str, symbol: &str, source: Error) -> Self {
        Self {
            interval: interval.to_string(),
            symbol: symbol.to_string(),
            source,
        }
    }
}
