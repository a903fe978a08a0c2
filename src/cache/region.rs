use std::fmt;
use std::fmt::Debug;
use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use speedy::Endianness;
use speedy::Readable;
use speedy::Writable;
use tracing::debug;

use crate::cache::{Failure, FailureHandler, LogFailures, NoopLock, Operation};
use crate::error::{CacheError, Result};
use crate::metrics::Metrics;
use crate::store::StoreLocator;

const CODEC: Endianness = Endianness::LittleEndian;

/// Values a region can hold. Encoded with `speedy` before they reach the store.
pub trait CacheValue: for<'a> Readable<'a, Endianness> + Writable<Endianness> + Send + Sync {}

impl<T> CacheValue for T where
    T: for<'a> Readable<'a, Endianness> + Writable<Endianness> + Send + Sync
{
}

/// One cache region, stored as a single hash in the shared store.
///
/// The region id is the hash key and each cached entry is a field named by
/// the entry key's `Display` output, so distinct keys that print the same
/// share a field.
///
/// `put`, `get`, `remove`, `clear` and `size` never fail: store errors go to
/// the region's [`FailureHandler`] and the call returns a miss, a lost write or
/// zero. The `try_` variants return the error instead.
pub struct RegionCache<V> {
    id: String,
    timeout: Option<Duration>,
    locator: StoreLocator,
    metrics: Arc<Metrics>,
    failures: Arc<dyn FailureHandler>,
    lock: NoopLock,
    _value: PhantomData<fn() -> V>,
}

impl<V> Debug for RegionCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionCache")
            .field("id", &self.id)
            .field("timeout", &self.timeout)
            .field("locator", &self.locator)
            .finish()
    }
}

impl<V> Display for RegionCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Redis {{{}}}", self.id)
    }
}

impl<V> RegionCache<V> {
    pub fn new(id: impl Into<String>, locator: StoreLocator) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(CacheError::InvalidConfiguration(
                "cache instances require an id".into(),
            ));
        }

        Ok(Self {
            id,
            timeout: None,
            locator,
            metrics: Arc::new(Metrics::default()),
            failures: Arc::new(LogFailures),
            lock: NoopLock,
            _value: PhantomData,
        })
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_failure_handler(mut self, failures: Arc<dyn FailureHandler>) -> Self {
        self.failures = failures;
        self
    }

    /// Namespace TTL refreshed by every write. `None` leaves entries to the
    /// store's own eviction.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn lock(&self) -> &NoopLock {
        &self.lock
    }

    fn fail(&self, operation: Operation, field: Option<&str>, error: &CacheError) {
        self.metrics.store_failures.fetch_add(1, Ordering::Relaxed);
        self.failures.on_failure(&Failure {
            operation,
            namespace: &self.id,
            field,
            error,
        });
    }
}

impl<V: CacheValue> RegionCache<V> {
    pub async fn put(&self, key: impl Display, value: &V) {
        let field = key.to_string();
        if let Err(error) = self.put_field(&field, value).await {
            self.fail(Operation::Put, Some(&field), &error);
        }
    }

    pub async fn get(&self, key: impl Display) -> Option<V> {
        let field = key.to_string();
        self.get_field(&field).await.unwrap_or_else(|error| {
            self.fail(Operation::Get, Some(&field), &error);
            None
        })
    }

    /// Delete an entry, returning the value it held.
    pub async fn remove(&self, key: impl Display) -> Option<V> {
        let field = key.to_string();
        self.remove_field(&field).await.unwrap_or_else(|error| {
            self.fail(Operation::Remove, Some(&field), &error);
            None
        })
    }

    pub async fn clear(&self) {
        if let Err(error) = self.try_clear().await {
            self.fail(Operation::Clear, None, &error);
        }
    }

    pub async fn size(&self) -> usize {
        self.try_size().await.unwrap_or_else(|error| {
            self.fail(Operation::Size, None, &error);
            0
        })
    }

    pub async fn try_put(&self, key: impl Display, value: &V) -> Result<()> {
        self.put_field(&key.to_string(), value).await
    }

    pub async fn try_get(&self, key: impl Display) -> Result<Option<V>> {
        self.get_field(&key.to_string()).await
    }

    pub async fn try_remove(&self, key: impl Display) -> Result<Option<V>> {
        self.remove_field(&key.to_string()).await
    }

    pub async fn try_clear(&self) -> Result<()> {
        self.metrics.cache_clears.fetch_add(1, Ordering::Relaxed);

        let store = self.locator.resolve()?;
        store.del(&self.id).await
    }

    pub async fn try_size(&self) -> Result<usize> {
        self.metrics
            .cache_size_queries
            .fetch_add(1, Ordering::Relaxed);

        let store = self.locator.resolve()?;
        store.hlen(&self.id).await
    }

    async fn put_field(&self, field: &str, value: &V) -> Result<()> {
        self.metrics.cache_writes.fetch_add(1, Ordering::Relaxed);

        let store = self.locator.resolve()?;
        let bytes = value.write_to_vec_with_ctx(CODEC)?;
        store.hset(&self.id, field, bytes).await?;

        if let Some(ttl) = self.timeout {
            store.pexpire(&self.id, ttl).await?;
        }
        Ok(())
    }

    async fn get_field(&self, field: &str) -> Result<Option<V>> {
        self.metrics.cache_queries.fetch_add(1, Ordering::Relaxed);

        let store = self.locator.resolve()?;
        match store.hget(&self.id, field).await? {
            Some(bytes) => {
                debug!("Cache hit for {}:{}", self.id, field);
                self.metrics.cache_hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(V::read_from_buffer_with_ctx(CODEC, &bytes)?))
            }
            None => {
                debug!("Cache miss for {}:{}", self.id, field);
                self.metrics.cache_misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    async fn remove_field(&self, field: &str) -> Result<Option<V>> {
        self.metrics.cache_removes.fetch_add(1, Ordering::Relaxed);

        let store = self.locator.resolve()?;
        store
            .hdel(&self.id, field)
            .await?
            .map(|bytes| V::read_from_buffer_with_ctx(CODEC, &bytes))
            .transpose()
            .map_err(CacheError::from)
    }
}
