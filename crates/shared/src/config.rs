//! Application configuration management.

use chrono::NaiveDate;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Forecast (snapshot and clock) configuration.
    #[serde(default)]
    pub forecast: ForecastConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

fn default_filter() -> String {
    "spendful=info".to_string()
}

/// Forecast configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    /// Path of the JSON budget snapshot to load.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
    /// Pins "today" for balance projection. Uses the system clock when unset.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            today: None,
        }
    }
}

fn default_snapshot_path() -> String {
    "budget.json".to_string()
}

impl AppConfig {
    /// Loads configuration from config files and `SPENDFUL__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SPENDFUL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
