//! Configuration management for the Material Consumption Tracker
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with CTRACK_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::Capacities;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Inventory capacities
    pub inventory: InventoryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

/// Starting stock of each material. Remaining inventory is this minus
/// everything ever recorded.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct InventoryConfig {
    pub rippon_capacity: i64,
    pub labels_capacity: i64,
}

impl InventoryConfig {
    pub fn capacities(&self) -> Capacities {
        Capacities {
            rippon: self.rippon_capacity,
            labels: self.labels_capacity,
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("CTRACK_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("inventory.rippon_capacity", 50)?
            .set_default("inventory.labels_capacity", 30)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CTRACK_ prefix)
            .add_source(
                Environment::with_prefix("CTRACK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        let capacities = Capacities::default();
        Self {
            rippon_capacity: capacities.rippon,
            labels_capacity: capacities.labels,
        }
    }
}
