// src/config.rs
//! Layered runtime configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Built-in defaults
//! 2. `config/verifier.{toml,yaml,json}` (optional)
//! 3. `VERIFIER__*` environment variables, e.g. `VERIFIER__SERVER__PORT=8080`
//!
//! `.env` is loaded by `main` before this runs.

use crate::error::ConfigError;
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

/// Google's JSON DNS-over-HTTPS endpoint.
pub const DEFAULT_DOH_ENDPOINT: &str = "https://dns.google/resolve";

/// Upload size limit in bytes.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 2 * 1_024_000;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub resolver: ResolverSettings,
    pub upload: UploadSettings,
    pub results: ResultsSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolverSettings {
    /// JSON DoH endpoint queried as `?name=<host>&type=TXT`
    pub endpoint: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    pub max_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultsSettings {
    pub per_page: usize,
}

impl Settings {
    /// Loads settings from all sources.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_builder(
            config::Config::builder()
                .add_source(config::File::with_name("config/verifier").required(false))
                .add_source(config::Environment::with_prefix("VERIFIER").separator("__")),
        )
    }

    /// Defaults overlaid with the given builder's sources.
    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let settings = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000_i64)?
            .set_default("resolver.endpoint", DEFAULT_DOH_ENDPOINT)?
            .set_default("resolver.timeout_secs", 5_i64)?
            .set_default("upload.max_bytes", DEFAULT_MAX_UPLOAD_BYTES as i64)?
            .set_default("results.per_page", 15_i64)?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn resolver_timeout(&self) -> Duration {
        Duration::from_secs(self.resolver.timeout_secs)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| {
                ConfigError::Load(config::ConfigError::Message(format!(
                    "invalid server address: {}",
                    e
                )))
            })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            resolver: ResolverSettings {
                endpoint: DEFAULT_DOH_ENDPOINT.to_string(),
                timeout_secs: 5,
            },
            upload: UploadSettings {
                max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            results: ResultsSettings { per_page: 15 },
        }
    }
}
