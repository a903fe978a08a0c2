use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::error::Result;
use crate::store::HashStore;

#[derive(Debug, Default)]
struct Namespace {
    fields: HashMap<String, Vec<u8>>,
    expires_at: Option<Instant>,
}

impl Namespace {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

type DB = Arc<RwLock<HashMap<String, Namespace>>>;

/// In-process [`HashStore`] with Redis hash semantics.
///
/// Expiry is namespace-wide and enforced lazily: an expired namespace is
/// dropped the next time anything touches it. Removing the last field removes
/// the namespace along with its TTL.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    db: DB,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining time-to-live of a namespace, `None` if it is missing or persistent.
    pub async fn pttl(&self, namespace: &str) -> Option<Duration> {
        let now = Instant::now();
        let db = self.db.read().await;
        let ns = db.get(namespace).filter(|ns| !ns.is_expired(now))?;
        ns.expires_at.map(|at| at.saturating_duration_since(now))
    }

    pub async fn contains_namespace(&self, namespace: &str) -> bool {
        let now = Instant::now();
        let db = self.db.read().await;
        db.get(namespace).is_some_and(|ns| !ns.is_expired(now))
    }

    fn purge_expired(db: &mut HashMap<String, Namespace>, namespace: &str) {
        if db
            .get(namespace)
            .is_some_and(|ns| ns.is_expired(Instant::now()))
        {
            db.remove(namespace);
        }
    }
}

#[async_trait]
impl HashStore for MemoryStore {
    async fn hset(&self, namespace: &str, field: &str, value: Vec<u8>) -> Result<()> {
        let mut db = self.db.write().await;
        Self::purge_expired(&mut db, namespace);
        db.entry(namespace.to_owned())
            .or_default()
            .fields
            .insert(field.to_owned(), value);
        Ok(())
    }

    async fn hget(&self, namespace: &str, field: &str) -> Result<Option<Vec<u8>>> {
        let now = Instant::now();
        let db = self.db.read().await;
        Ok(db
            .get(namespace)
            .filter(|ns| !ns.is_expired(now))
            .and_then(|ns| ns.fields.get(field).cloned()))
    }

    async fn hdel(&self, namespace: &str, field: &str) -> Result<Option<Vec<u8>>> {
        let mut db = self.db.write().await;
        Self::purge_expired(&mut db, namespace);

        let Some(ns) = db.get_mut(namespace) else {
            return Ok(None);
        };
        let prior = ns.fields.remove(field);
        if ns.fields.is_empty() {
            db.remove(namespace);
        }
        Ok(prior)
    }

    async fn hlen(&self, namespace: &str) -> Result<usize> {
        let now = Instant::now();
        let db = self.db.read().await;
        Ok(db
            .get(namespace)
            .filter(|ns| !ns.is_expired(now))
            .map_or(0, |ns| ns.fields.len()))
    }

    async fn del(&self, namespace: &str) -> Result<()> {
        self.db.write().await.remove(namespace);
        Ok(())
    }

    async fn pexpire(&self, namespace: &str, ttl: Duration) -> Result<()> {
        let mut db = self.db.write().await;
        Self::purge_expired(&mut db, namespace);
        if let Some(ns) = db.get_mut(namespace) {
            ns.expires_at = Some(Instant::now() + ttl);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fields_are_scoped_by_namespace() {
        let store = MemoryStore::new();
        store.hset("orders", "1", b"a".to_vec()).await.unwrap();
        store.hset("users", "1", b"b".to_vec()).await.unwrap();

        assert_eq!(store.hget("orders", "1").await.unwrap(), Some(b"a".to_vec()));
        assert_eq!(store.hget("users", "1").await.unwrap(), Some(b"b".to_vec()));
        assert_eq!(store.hlen("orders").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn hdel_reports_prior_value_and_drops_empty_namespace() {
        let store = MemoryStore::new();
        store.hset("orders", "1", b"a".to_vec()).await.unwrap();

        assert_eq!(store.hdel("orders", "1").await.unwrap(), Some(b"a".to_vec()));
        assert_eq!(store.hdel("orders", "1").await.unwrap(), None);
        assert!(!store.contains_namespace("orders").await);
    }

    #[tokio::test]
    async fn pexpire_on_missing_namespace_is_ignored() {
        let store = MemoryStore::new();
        store
            .pexpire("orders", Duration::from_millis(10))
            .await
            .unwrap();

        assert!(!store.contains_namespace("orders").await);
        assert_eq!(store.pttl("orders").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn namespace_expires_as_a_whole() {
        let store = MemoryStore::new();
        store.hset("orders", "1", b"a".to_vec()).await.unwrap();
        store.hset("orders", "2", b"b".to_vec()).await.unwrap();
        store
            .pexpire("orders", Duration::from_millis(5000))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_millis(4999)).await;
        assert_eq!(store.hlen("orders").await.unwrap(), 2);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(store.hlen("orders").await.unwrap(), 0);
        assert_eq!(store.hget("orders", "1").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn write_after_expiry_starts_a_fresh_persistent_namespace() {
        let store = MemoryStore::new();
        store.hset("orders", "1", b"a".to_vec()).await.unwrap();
        store
            .pexpire("orders", Duration::from_millis(10))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_millis(20)).await;

        store.hset("orders", "2", b"b".to_vec()).await.unwrap();

        assert_eq!(store.hlen("orders").await.unwrap(), 1);
        assert_eq!(store.pttl("orders").await, None);
    }
}
