mod redis_store;

use std::future::Future;
#[cfg(test)]
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use redis_store::RedisCacheStore;

#[derive(Clone, Debug)]
enum CacheBackend {
    Disabled,
    Redis(RedisCacheStore),
    /// Records evictions instead of talking to a server.
    #[cfg(test)]
    Recording(Arc<Mutex<Vec<String>>>),
}

/// Optional read-through cache in front of single-record lookups.
#[derive(Clone, Debug)]
pub struct CacheService {
    key_prefix: String,
    backend: CacheBackend,
}

impl CacheService {
    pub fn disabled(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Disabled,
        }
    }

    pub fn redis(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Redis(RedisCacheStore::from_url(redis_url)?),
        })
    }

    pub fn key(&self, suffix: impl AsRef<str>) -> String {
        format!("{}:{}", self.key_prefix, suffix.as_ref())
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled => Ok(()),
            CacheBackend::Redis(store) => store.ping().await,
            #[cfg(test)]
            CacheBackend::Recording(_) => Ok(()),
        }
    }

    pub async fn get_json<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let value = match &self.backend {
            CacheBackend::Disabled => return Ok(None),
            CacheBackend::Redis(store) => store.get(key).await?,
            #[cfg(test)]
            CacheBackend::Recording(_) => return Ok(None),
        };

        match value {
            Some(bytes) => {
                let parsed = serde_json::from_slice(&bytes).map_err(|e| {
                    anyhow::anyhow!("failed to deserialize cache value for `{key}`: {e}")
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    pub async fn set_json<T>(&self, key: &str, value: &T, ttl: Duration) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let CacheBackend::Redis(store) = &self.backend else {
            return Ok(());
        };

        let ttl_seconds = ttl.as_secs().max(1);
        let payload = serde_json::to_vec(value)
            .map_err(|e| anyhow::anyhow!("failed to serialize cache value for `{key}`: {e}"))?;

        store.set(key, payload, ttl_seconds).await
    }

    pub async fn del(&self, key: &str) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled => Ok(()),
            CacheBackend::Redis(store) => store.del(key).await,
            #[cfg(test)]
            CacheBackend::Recording(log) => {
                if let Ok(mut log) = log.lock() {
                    log.push(format!("del {key}"));
                }
                Ok(())
            }
        }
    }

    /// Run `write` with `key` evicted both before and after it.
    ///
    /// The second eviction drops a value a concurrent reader loaded from the
    /// pre-write row and cached while `write` was in flight.
    pub async fn evict_around<T, F, Fut>(&self, key: &str, write: F) -> anyhow::Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        self.evict(key).await;
        let result = write().await;
        self.evict(key).await;
        result
    }

    async fn evict(&self, key: &str) {
        if let Err(e) = self.del(key).await {
            warn!(?e, cache_key = key, "cache invalidation failed");
        }
    }

    /// Serve `key` from the cache, otherwise run `loader` and cache a hit.
    ///
    /// Misses (`Ok(None)`) are never cached so that a record created later is
    /// visible immediately. Cache failures fall back to the loader.
    pub async fn get_or_load_json<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        loader: F,
    ) -> anyhow::Result<Option<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<Option<T>>>,
    {
        match self.get_json::<T>(key).await {
            Ok(Some(cached)) => return Ok(Some(cached)),
            Ok(None) => {}
            Err(e) => warn!(
                ?e,
                cache_key = key,
                "cache get failed; falling back to database"
            ),
        }

        let loaded = loader().await?;

        if let Some(value) = &loaded
            && let Err(e) = self.set_json(key, value, ttl).await
        {
            warn!(
                ?e,
                cache_key = key,
                "cache set failed; returning database value"
            );
        }

        Ok(loaded)
    }
}
