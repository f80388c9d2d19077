//! Server configuration module.
//!
//! Covers the listener only. `FLUXGATE_HOST` and `FLUXGATE_PORT` are both
//! optional; the required database settings live in [`crate::db`].

use anyhow::{Context, Result};
use std::net::SocketAddr;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 80;

/// Listener configuration for the ingestion service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host address to bind to (`FLUXGATE_HOST`, default `0.0.0.0`).
    pub host: String,
    /// Port to listen on (`FLUXGATE_PORT`, default `80`).
    pub port: u16,
}

impl Config {
    /// Reads the listener configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `FLUXGATE_PORT` is set to something that does
    /// not parse as a port number. An unset variable falls back to its
    /// default instead.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("FLUXGATE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("FLUXGATE_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("FLUXGATE_PORT is not a valid port: {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self { host, port })
    }

    /// Returns the socket address for binding.
    ///
    /// # Panics
    ///
    /// Panics if the host and port combination cannot be parsed as a valid
    /// socket address.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address from config")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}
