use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context as _;
use tracing::Level;

use roster_database::DEFAULT_PLAYER_CACHE_TTL;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres { database_url: String },
    Memory,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedisSettings {
    pub enabled: bool,
    pub url: Option<String>,
    pub key_prefix: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub storage: StorageBackend,
    pub bind_addr: SocketAddr,
    pub base_path: String,
    pub max_connections: u32,
    pub auto_run_migrations: bool,
    pub redis: RedisSettings,
    pub player_cache_ttl: Duration,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let storage = match var("STORAGE_BACKEND")
            .map(|value| value.to_ascii_lowercase())
            .as_deref()
        {
            None | Some("postgres") => StorageBackend::Postgres {
                database_url: var("DATABASE_URL")
                    .context("DATABASE_URL must be set for the postgres storage backend")?,
            },
            Some("memory") => StorageBackend::Memory,
            Some(other) => anyhow::bail!("unknown STORAGE_BACKEND `{other}`"),
        };

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_owned())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:8080")?;

        let max_connections = u32::try_from(parse_u64(var("DB_MAX_CONNECTIONS"), 5))
            .unwrap_or(u32::MAX)
            .max(1);

        let log_level = match var("LOG_LEVEL") {
            Some(value) => value
                .parse::<Level>()
                .map_err(|_| anyhow::anyhow!("unknown LOG_LEVEL `{value}`"))?,
            None => Level::INFO,
        };

        Ok(Self {
            storage,
            bind_addr,
            base_path: var("HTTP_BASE_PATH").unwrap_or_default(),
            max_connections,
            auto_run_migrations: parse_bool(var("AUTO_RUN_MIGRATIONS"), true),
            redis: RedisSettings {
                enabled: parse_bool(var("REDIS_ENABLED"), false),
                url: var("REDIS_URL"),
                key_prefix: var("REDIS_KEY_PREFIX").unwrap_or_else(|| "roster:prod".to_owned()),
            },
            player_cache_ttl: Duration::from_secs(parse_u64(
                var("PLAYER_CACHE_TTL_SECONDS"),
                DEFAULT_PLAYER_CACHE_TTL.as_secs(),
            )),
            log_level,
        })
    }
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    match value {
        Some(value) => matches!(
            value.to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => default,
    }
}

fn parse_u64(value: Option<String>, default: u64) -> u64 {
    value
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}
