use std::future::Future;
use std::time::Duration;

use log::debug;
use moka::future::Cache;

use crate::config::CacheSettings;

/// Short-lived memo of resolved metric values, keyed by metric name.
///
/// Only finished values are stored. Two callers that miss at the same time
/// both run the producer; nothing deduplicates in-flight work, and a failed
/// producer leaves the key empty.
#[derive(Clone)]
pub struct MetricCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<String, V>,
}

impl<V> MetricCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(settings: &CacheSettings) -> Self {
        let inner = Cache::builder()
            .max_capacity(settings.max_capacity)
            .time_to_live(Duration::from_secs(settings.ttl_secs))
            .build();
        Self { inner }
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        let inner = Cache::builder().max_capacity(16).time_to_live(ttl).build();
        Self { inner }
    }

    /// Return the cached value for `key`, or run `producer` and cache its result.
    pub async fn remember<F, Fut, E>(&self, key: &str, producer: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.inner.get(key).await {
            debug!("Cache hit for {}", key);
            return Ok(hit);
        }

        let value = producer().await?;
        self.inner.insert(key.to_string(), value.clone()).await;
        Ok(value)
    }
}
