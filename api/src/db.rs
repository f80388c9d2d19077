//! Database connection module for InfluxDB.
//!
//! This module provides client configuration for the InfluxDB v2 backend.
//! Connection parameters come from the environment; all of them are required
//! because the service cannot write anywhere without them.

use influxdb2::Client;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while loading the database configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required environment variables are unset or empty.
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),
}

/// Database configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// InfluxDB server URL (e.g., <http://influxdb:8086>)
    pub url: String,
    /// API token for authentication
    pub token: String,
    /// Organization the bucket belongs to
    pub org: String,
    /// Bucket to write points into
    pub bucket: String,
}

impl DatabaseConfig {
    /// Load database configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `INFLUXDB_URL`: Server URL
    /// - `INFLUXDB_TOKEN`: API token
    /// - `INFLUXDB_ORG`: Organization name
    /// - `INFLUXDB_BUCKET`: Target bucket
    ///
    /// All four are required. An empty value counts as missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVariables`] naming every variable that
    /// is unset or empty, not just the first one encountered.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut require = |name: &str| match lookup(name) {
            Some(value) if !value.is_empty() => value,
            _ => {
                missing.push(name.to_string());
                String::new()
            }
        };

        let url = require("INFLUXDB_URL");
        let token = require("INFLUXDB_TOKEN");
        let org = require("INFLUXDB_ORG");
        let bucket = require("INFLUXDB_BUCKET");

        if missing.is_empty() {
            Ok(Self {
                url,
                token,
                org,
                bucket,
            })
        } else {
            Err(ConfigError::MissingVariables(missing))
        }
    }
}

/// Database client wrapper.
#[derive(Clone)]
pub struct Database {
    client: Arc<Client>,
}

impl Database {
    /// Create a new database client from configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Database configuration
    ///
    /// # Returns
    ///
    /// A new Database instance with configured client.
    #[must_use]
    pub fn new(config: &DatabaseConfig) -> Self {
        let client = Client::new(&config.url, &config.org, &config.token);

        Self {
            client: Arc::new(client),
        }
    }

    /// Get a reference to the underlying InfluxDB client.
    ///
    /// # Returns
    ///
    /// An Arc-wrapped InfluxDB client.
    #[must_use]
    pub fn client(&self) -> Arc<Client> {
        Arc::clone(&self.client)
    }
}
