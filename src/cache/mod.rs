mod failure;
mod lock;
mod region;

pub use failure::{Failure, FailureHandler, LogFailures, Operation};
pub use lock::{NoopGuard, NoopLock};
pub use region::{CacheValue, RegionCache};
