/// The lock a cache region hands to callers that ask for one.
///
/// It provides no mutual exclusion: acquiring either side never blocks and
/// concurrent writes to the same field race in the store, last write wins.
/// Callers that need serialization must get it from the store or their own
/// locking layer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoopLock;

/// Guard returned by [`NoopLock`]. Holding it excludes nothing.
#[derive(Debug)]
pub struct NoopGuard(());

impl NoopLock {
    pub fn read(&self) -> NoopGuard {
        NoopGuard(())
    }

    pub fn write(&self) -> NoopGuard {
        NoopGuard(())
    }

    /// Always `false`.
    pub fn is_exclusive(&self) -> bool {
        false
    }
}
