// In crates/app-config/src/types.rs

use serde::Deserialize;

pub use strategies::types::MACrossoverSettings;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Settings for the market-data provider.
    pub provider: ProviderSettings,
    /// Windows for the moving-average crossover.
    #[serde(default)]
    pub strategy: MACrossoverSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProviderSettings {
    /// Base URL of the chart endpoint; the ticker is appended as a path segment.
    pub base_url: String,
    /// The provider throttles requests without a browser-like user agent.
    pub user_agent: String,
    /// Request timeout handed to the HTTP client. No timeout when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}
