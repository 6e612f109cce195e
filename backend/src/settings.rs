//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `SOCIAL_*` environment variables and an
//! optional configuration file, in that order of precedence.

use std::net::SocketAddr;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use pagination::{DEFAULT_LIMIT, MAX_LIMIT};
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    /// No database URL was supplied.
    #[error("database_url is required (set SOCIAL_DATABASE_URL or pass --database-url)")]
    MissingDatabaseUrl,
    /// The bind address could not be parsed.
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
    /// The token lifetime must be a positive number of minutes.
    #[error("token_ttl_minutes must be positive, got {value}")]
    InvalidTokenTtl { value: i64 },
    /// The default page size must lie within `1..=100`.
    #[error("default_page_size must be between 1 and 100, got {value}")]
    InvalidPageSize { value: u32 },
}

/// Runtime configuration for the social backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SOCIAL")]
pub struct AppSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// Secret used to sign access tokens.
    pub jwt_secret: Option<String>,
    /// Access token lifetime in minutes.
    pub token_ttl_minutes: Option<i64>,
    /// Page size used when a list request omits `limit`.
    pub default_page_size: Option<u32>,
    /// Apply pending migrations before serving.
    pub run_migrations: Option<bool>,
    /// Maximum pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl AppSettings {
    /// Return the configured database URL.
    ///
    /// # Errors
    /// Returns [`SettingsError::MissingDatabaseUrl`] when unset or blank.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Return the listen address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidBindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| {
            SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            }
        })
    }

    /// Return the signing secret, if one was configured.
    pub fn jwt_secret(&self) -> Option<&[u8]> {
        self.jwt_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .map(str::as_bytes)
    }

    /// Return the access token lifetime, defaulting to one hour.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidTokenTtl`] for zero or negative values.
    pub fn token_ttl(&self) -> Result<TimeDelta, SettingsError> {
        let minutes = self.token_ttl_minutes.unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);
        if minutes <= 0 {
            return Err(SettingsError::InvalidTokenTtl { value: minutes });
        }
        TimeDelta::try_minutes(minutes).ok_or(SettingsError::InvalidTokenTtl { value: minutes })
    }

    /// Return the default page size, defaulting to 20.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidPageSize`] outside `1..=100`.
    pub fn default_page_size(&self) -> Result<u32, SettingsError> {
        let value = self.default_page_size.unwrap_or(DEFAULT_LIMIT);
        if value == 0 || value > MAX_LIMIT {
            return Err(SettingsError::InvalidPageSize { value });
        }
        Ok(value)
    }

    /// Whether to apply pending migrations at startup, defaulting to `true`.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Return the pool size, defaulting to ten connections.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }
}
