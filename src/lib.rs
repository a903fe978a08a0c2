//! Second-level cache regions kept in Redis hashes instead of process memory.
//!
//! Each [`RegionCache`] owns one namespace in a shared store and maps the
//! query cache operations onto hash primitives: `put` is `HSET` (followed by
//! `PEXPIRE` when a timeout is configured), `get` is `HGET`, `remove` is
//! `HDEL`, `size` is `HLEN` and `clear` deletes the namespace key.
//!
//! The store is injected through a [`StoreRegistry`] and resolved lazily by
//! each region's [`StoreLocator`]. Store failures never reach the caller of
//! the plain operations; they are reported to a [`FailureHandler`] and turned
//! into cache misses.

pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod store;

pub use cache::{FailureHandler, LogFailures, NoopLock, RegionCache};
pub use error::{CacheError, Result};
pub use metrics::Metrics;
pub use store::{HashStore, MemoryStore, RedisStore, StoreLocator, StoreRegistry};
