use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

use crate::constants::DEFAULT_PROXY_USER_HEADER;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    SingleUser,
    Proxy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub method: AuthMethod,
    pub proxy: Option<ProxyAuthConfig>,
    pub single_user: Option<SingleUserAuthConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProxyAuthConfig {
    /// Header set by the upstream gateway with the authenticated user's id.
    pub user_header: Option<String>,
}

impl ProxyAuthConfig {
    #[must_use]
    pub fn user_header(&self) -> &str {
        self.user_header
            .as_deref()
            .unwrap_or(DEFAULT_PROXY_USER_HEADER)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SingleUserAuthConfig {
    pub user_id: uuid::Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the address the server binds to, as "host:port".
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// ## Summary
    /// Returns the deadline applied to every service call made on behalf of a request.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    Memory,
    Disabled,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub ttl_secs: u64,
    pub max_capacity: u64,
}

impl CacheConfig {
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Splits environment variable names into config paths, so `CACHE__TTL_SECS`
/// sets `cache.ttl_secs`. A single `_` stays part of the key.
pub const ENV_SEPARATOR: &str = "__";

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Self::from_environment(environment())
    }

    /// ## Summary
    /// Builds settings from defaults, the given environment source and an
    /// optional `config.toml`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn from_environment(env: Environment) -> Result<Self> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8698)?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("database.max_connections", 4)?
            .set_default("logging.level", "debug")?
            .set_default("auth.method", "proxy")?
            .set_default("cache.backend", "memory")?
            .set_default("cache.ttl_secs", 900)?
            .set_default("cache.max_capacity", 10_000)?
            // Env file
            .add_source(env)
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// The process environment as a config source.
#[must_use]
pub fn environment() -> Environment {
    Environment::default()
        .separator(ENV_SEPARATOR)
        .ignore_empty(true)
        .try_parsing(true)
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
