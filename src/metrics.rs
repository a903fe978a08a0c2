use std::sync::atomic::AtomicUsize;

#[derive(Default, Debug)]
pub struct Metrics {
    pub cache_queries: AtomicUsize,
    pub cache_hits: AtomicUsize,
    pub cache_misses: AtomicUsize,

    pub cache_writes: AtomicUsize,
    pub cache_removes: AtomicUsize,
    pub cache_clears: AtomicUsize,
    pub cache_size_queries: AtomicUsize,

    /// Store errors swallowed by the total operations.
    pub store_failures: AtomicUsize,
}
