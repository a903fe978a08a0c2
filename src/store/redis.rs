use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use redis::Client;
use tracing::debug;

use crate::config::RedisConfig;
use crate::error::Result;
use crate::store::HashStore;

/// [`HashStore`] backed by Redis hashes.
///
/// Clones share one multiplexed connection, so a single `RedisStore` can be
/// installed in a registry and handed to every cache region.
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
    conn: MultiplexedConnection,
}

// Debug is required for eyre pretty printing, but [MultiplexedConnection] is not useful to print.
impl Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("client", &self.client)
            .finish()
    }
}

impl RedisStore {
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let client = Client::open(config.url.clone())?;
        let conn = client.get_multiplexed_tokio_connection().await?;
        debug!("connected to {}", config.url);

        Ok(Self { client, conn })
    }
}

#[async_trait]
impl HashStore for RedisStore {
    async fn hset(&self, namespace: &str, field: &str, value: Vec<u8>) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.hset(namespace, field, value).await?;
        Ok(())
    }

    async fn hget(&self, namespace: &str, field: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.hget(namespace, field).await?;
        Ok(value)
    }

    async fn hdel(&self, namespace: &str, field: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let (prior, removed): (Option<Vec<u8>>, usize) = redis::pipe()
            .atomic()
            .hget(namespace, field)
            .hdel(namespace, field)
            .query_async(&mut conn)
            .await?;

        debug!("HDEL {} {} removed {}", namespace, field, removed);
        Ok(prior)
    }

    async fn hlen(&self, namespace: &str) -> Result<usize> {
        let mut conn = self.conn.clone();
        let len: usize = conn.hlen(namespace).await?;
        Ok(len)
    }

    async fn del(&self, namespace: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(namespace).await?;
        Ok(())
    }

    async fn pexpire(&self, namespace: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let _: () = conn.pexpire(namespace, ms).await?;
        Ok(())
    }
}
