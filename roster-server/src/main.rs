mod config;

use std::sync::Arc;

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use roster_core::Data;
use roster_database::{CacheService, Database, MIGRATOR, MemoryStore, PlayerStore};

use crate::config::{Config, RedisSettings, StorageBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load the .env file
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    let max_level = config.log_level;
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(move |metadata| {
        if *metadata.level() > max_level {
            return false;
        }

        !metadata.target().starts_with("sqlx::query")
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    let store: Arc<dyn PlayerStore> = match &config.storage {
        StorageBackend::Postgres { database_url } => {
            Arc::new(connect_database(&config, database_url).await?)
        }
        StorageBackend::Memory => {
            warn!("Using the in-memory store; players are lost on shutdown.");
            Arc::new(MemoryStore::new())
        }
    };

    let app = roster_api::app(Data::new(store), &config.base_path);

    for route in roster_api::ROUTES {
        info!(
            method = route.method,
            path = %format!("{}{}", config.base_path.trim_end_matches('/'), route.path),
            "{}",
            route.desc
        );
    }

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Roster API listening.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Roster API stopped.");
    Ok(())
}

async fn connect_database(config: &Config, database_url: &str) -> anyhow::Result<Database> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await?;
    info!("PostgreSQL connection established.");

    let cache = build_cache(&config.redis).await;
    let db = Database::with_cache(pool, cache).with_cache_ttl(config.player_cache_ttl);

    if config.auto_run_migrations {
        MIGRATOR.run(db.pool()).await?;
        info!("Database migrations applied.");
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    Ok(db)
}

async fn build_cache(redis: &RedisSettings) -> CacheService {
    let key_prefix = redis.key_prefix.clone();

    if !redis.enabled {
        info!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        return CacheService::disabled(key_prefix);
    }

    let Some(redis_url) = &redis.url else {
        warn!(key_prefix = %key_prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing with DB-only mode.");
        return CacheService::disabled(key_prefix);
    };

    let cache = match CacheService::redis(redis_url, key_prefix.clone()) {
        Ok(cache) => cache,
        Err(err) => {
            warn!(?err, key_prefix = %key_prefix, "Failed to initialize Redis cache; continuing with DB-only mode.");
            return CacheService::disabled(key_prefix);
        }
    };

    if let Err(err) = cache.ping().await {
        warn!(
            ?err,
            "Redis cache ping failed; cache operations will continue with fallback behavior."
        );
    } else {
        info!(key_prefix = %key_prefix, "Redis cache enabled.");
    }

    cache
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(?err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(?err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received.");
}
