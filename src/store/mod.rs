mod locator;
mod memory;
mod redis;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// The hash-map primitives a cache region needs from its backing store.
///
/// A namespace is the outer key and owns one hash; fields are the inner keys.
/// Values are opaque bytes at this level.
#[async_trait]
pub trait HashStore: Send + Sync {
    /// Set `field` in the namespace hash, creating the namespace if needed.
    async fn hset(&self, namespace: &str, field: &str, value: Vec<u8>) -> Result<()>;

    /// Read `field` from the namespace hash.
    async fn hget(&self, namespace: &str, field: &str) -> Result<Option<Vec<u8>>>;

    /// Delete `field` from the namespace hash.
    ///
    /// Returns the value the field held, or `None` if it was not present.
    async fn hdel(&self, namespace: &str, field: &str) -> Result<Option<Vec<u8>>>;

    /// Number of fields in the namespace hash. Missing namespaces count as empty.
    async fn hlen(&self, namespace: &str) -> Result<usize>;

    /// Delete the whole namespace.
    async fn del(&self, namespace: &str) -> Result<()>;

    /// Set the namespace time-to-live. A missing namespace is left alone.
    async fn pexpire(&self, namespace: &str, ttl: Duration) -> Result<()>;
}

pub use locator::{StoreLocator, StoreRegistry};
pub use memory::MemoryStore;
pub use redis::RedisStore;
