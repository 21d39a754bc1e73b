// In crates/app-config/src/lib.rs

use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, MACrossoverSettings, ProviderSettings, Settings};

pub const DEFAULT_PROVIDER_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Loads the application settings from the `config` directory.
pub fn load_settings() -> Result<Settings> {
    load_settings_from("config")
}

/// Loads the application settings from `dir`.
///
/// Layers, later ones winning:
/// 1. Built-in defaults.
/// 2. `base.toml`, if present.
/// 3. The environment-specific file (e.g., `development.toml`), if present.
/// 4. Environment variables (e.g., `APP_PROVIDER__BASE_URL=...`).
pub fn load_settings_from(dir: impl AsRef<Path>) -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
    let dir = dir.as_ref();

    let settings = with_defaults(Config::builder())?
        .set_default("app.environment", environment.as_str())?
        .add_source(File::with_name(&dir.join("base").to_string_lossy()).required(false))
        .add_source(File::with_name(&dir.join(&environment).to_string_lossy()).required(false))
        // The prefix is `APP`, separator is `__`.
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

fn with_defaults(builder: ConfigBuilder<DefaultState>) -> Result<ConfigBuilder<DefaultState>> {
    let defaults = MACrossoverSettings::default();
    Ok(builder
        .set_default("app.environment", "development")?
        .set_default("app.log_level", "info")?
        .set_default("provider.base_url", DEFAULT_PROVIDER_URL)?
        .set_default("provider.user_agent", DEFAULT_USER_AGENT)?
        .set_default("strategy.short_window", defaults.short_window as i64)?
        .set_default("strategy.long_window", defaults.long_window as i64)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Settings {
        with_defaults(Config::builder())
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn defaults_fill_every_section() {
        let settings = from_toml("");
        assert_eq!(settings.app.log_level, "info");
        assert_eq!(settings.provider.base_url, DEFAULT_PROVIDER_URL);
        assert_eq!(settings.provider.timeout_secs, None);
        assert_eq!(settings.strategy, MACrossoverSettings::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let settings = from_toml(
            r#"
            [app]
            log_level = "debug"

            [provider]
            base_url = "http://localhost:9000/chart"
            timeout_secs = 15

            [strategy]
            short_window = 10
            long_window = 50
            "#,
        );
        assert_eq!(settings.app.log_level, "debug");
        assert_eq!(settings.provider.base_url, "http://localhost:9000/chart");
        assert_eq!(settings.provider.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(settings.provider.timeout_secs, Some(15));
        assert_eq!(settings.strategy.short_window, 10);
        assert_eq!(settings.strategy.long_window, 50);
    }

    #[test]
    fn missing_directory_falls_back_to_defaults() {
        let settings = load_settings_from("no/such/config/dir").unwrap();
        assert_eq!(settings.strategy.long_window, 20);
    }
}
