use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::core::{LimitPolicy, QueryComposer, DEFAULT_LIMIT, DEFAULT_SRID, MAX_LIMIT};
use crate::models::RegionSelector;
use crate::services::PoolOptions;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub query: QuerySettings,
    #[serde(default)]
    pub region: RegionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
    #[serde(default)]
    pub run_migrations: bool,
}

impl DatabaseSettings {
    pub fn pool_options(&self) -> PoolOptions {
        let defaults = PoolOptions::default();
        PoolOptions {
            max_connections: self.max_connections.unwrap_or(defaults.max_connections),
            min_connections: self.min_connections.unwrap_or(defaults.min_connections),
            acquire_timeout: self
                .acquire_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.acquire_timeout),
            idle_timeout: self
                .idle_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle_timeout),
        }
    }
}

/// Polygon query policy
#[derive(Debug, Clone, Deserialize)]
pub struct QuerySettings {
    #[serde(default = "default_limit")]
    pub default_limit: u32,
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
    /// Spatial reference system of stored lat/lng and client polygons
    #[serde(default = "default_srid")]
    pub srid: i32,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            srid: default_srid(),
        }
    }
}

impl QuerySettings {
    pub fn composer(&self) -> QueryComposer {
        QueryComposer::new(LimitPolicy::new(self.default_limit, self.max_limit), self.srid)
    }
}

fn default_limit() -> u32 { DEFAULT_LIMIT }
fn default_max_limit() -> u32 { MAX_LIMIT }
fn default_srid() -> i32 { DEFAULT_SRID }

/// Region used by the listing endpoint when the query string omits one
#[derive(Debug, Clone, Deserialize)]
pub struct RegionSettings {
    #[serde(default = "default_sido")]
    pub default_sido: String,
    #[serde(default = "default_sgg")]
    pub default_sgg: String,
    #[serde(default = "default_emd")]
    pub default_emd: String,
}

impl Default for RegionSettings {
    fn default() -> Self {
        Self {
            default_sido: default_sido(),
            default_sgg: default_sgg(),
            default_emd: default_emd(),
        }
    }
}

impl RegionSettings {
    pub fn selector(&self) -> RegionSelector {
        RegionSelector {
            sido_nm: self.default_sido.clone(),
            sgg_nm: self.default_sgg.clone(),
            emd_nm: self.default_emd.clone(),
        }
    }
}

fn default_sido() -> String { "경기도".to_string() }
fn default_sgg() -> String { "화성시".to_string() }
fn default_emd() -> String { "남양읍".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with JUSO_)
    /// 5. DATABASE_URL, if set
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., JUSO__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("JUSO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_database_url(settings)?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.query.default_limit == 0 || self.query.max_limit == 0 {
            return Err(ConfigError::Message(
                "query.default_limit and query.max_limit must be at least 1".to_string(),
            ));
        }
        if self.query.srid <= 0 {
            return Err(ConfigError::Message(format!(
                "query.srid must be a positive EPSG code, got {}",
                self.query.srid
            )));
        }
        Ok(())
    }
}

/// Let the conventional DATABASE_URL override `database.url`
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        Err(_) => Ok(settings),
    }
}
