//! Configuration management for the farm dashboard server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FARM_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{
    LifecycleDeriver, LifecycleResult, LifecycleThresholds, GROWING_FROM_PERCENT,
    HEALTH_RISK_BELOW, IRRIGATION_RISK_BELOW, MATURING_FROM_PERCENT, READY_FROM_PERCENT,
};

/// Default look-ahead for the upcoming harvests widget
pub const DEFAULT_SUMMARY_HORIZON_DAYS: u32 = 14;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Crop lifecycle thresholds
    pub lifecycle: LifecycleConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LifecycleConfig {
    /// Progress (%) at which a crop counts as growing
    pub growing_from: u8,

    /// Progress (%) at which a crop counts as maturing
    pub maturing_from: u8,

    /// Progress (%) at which a crop counts as ready to harvest
    pub ready_from: u8,

    /// Health (%) below which a crop is flagged
    pub health_risk_below: i32,

    /// Irrigation level (%) below which a crop is flagged
    pub irrigation_risk_below: i32,

    /// Days ahead included in the upcoming harvests list
    pub summary_horizon_days: u32,
}

impl LifecycleConfig {
    pub fn thresholds(&self) -> LifecycleThresholds {
        LifecycleThresholds {
            growing_from: self.growing_from,
            maturing_from: self.maturing_from,
            ready_from: self.ready_from,
            health_risk_below: self.health_risk_below,
            irrigation_risk_below: self.irrigation_risk_below,
        }
    }

    /// Build a deriver, rejecting inconsistent thresholds
    pub fn deriver(&self) -> LifecycleResult<LifecycleDeriver> {
        LifecycleDeriver::new(self.thresholds())
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("FARM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("lifecycle.growing_from", i64::from(GROWING_FROM_PERCENT))?
            .set_default("lifecycle.maturing_from", i64::from(MATURING_FROM_PERCENT))?
            .set_default("lifecycle.ready_from", i64::from(READY_FROM_PERCENT))?
            .set_default("lifecycle.health_risk_below", i64::from(HEALTH_RISK_BELOW))?
            .set_default(
                "lifecycle.irrigation_risk_below",
                i64::from(IRRIGATION_RISK_BELOW),
            )?
            .set_default(
                "lifecycle.summary_horizon_days",
                i64::from(DEFAULT_SUMMARY_HORIZON_DAYS),
            )?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FARM_ prefix)
            .add_source(
                Environment::with_prefix("FARM")
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
            server: ServerConfig::default(),
            lifecycle: LifecycleConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        let thresholds = LifecycleThresholds::default();
        Self {
            growing_from: thresholds.growing_from,
            maturing_from: thresholds.maturing_from,
            ready_from: thresholds.ready_from,
            health_risk_below: thresholds.health_risk_below,
            irrigation_risk_below: thresholds.irrigation_risk_below,
            summary_horizon_days: DEFAULT_SUMMARY_HORIZON_DAYS,
        }
    }
}
