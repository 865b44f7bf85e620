//! Configuration management for the pharmacy back-office core
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with DSP_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Alert engine thresholds
    pub alerts: AlertsConfig,

    /// Sales policy
    pub sales: SalesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertsConfig {
    /// Stock level at or below which a low-stock alert is raised
    pub low_stock_threshold: i32,

    /// Days ahead within which an expiry alert is raised
    pub expiry_window_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SalesConfig {
    /// Minimum client age, in whole years, to be named on a sale
    pub minimum_client_age: i32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("DSP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("alerts.low_stock_threshold", 10)?
            .set_default("alerts.expiry_window_days", 30)?
            .set_default("sales.minimum_client_age", 18)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (DSP_ prefix)
            .add_source(
                Environment::with_prefix("DSP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            alerts: AlertsConfig::default(),
            sales: SalesConfig::default(),
        }
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 10,
            expiry_window_days: 30,
        }
    }
}

impl Default for SalesConfig {
    fn default() -> Self {
        Self {
            minimum_client_age: 18,
        }
    }
}
