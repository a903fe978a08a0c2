use thiserror::Error;

/// Everything that can go wrong between a cache region and its store.
///
/// Only [`CacheError::InvalidConfiguration`] ever escapes the total cache
/// operations; the rest are handed to a
/// [`FailureHandler`](crate::cache::FailureHandler) and replaced by a safe default.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("invalid cache configuration: {0}")]
    InvalidConfiguration(String),

    #[error("store registry has not been initialized")]
    RegistryUninitialized,

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("store operation failed: {0}")]
    StoreOperationFailed(String),

    #[error("value codec failed: {0}")]
    Codec(#[from] speedy::Error),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_refusal()
            || err.is_connection_dropped()
            || err.is_io_error()
            || err.is_timeout()
        {
            CacheError::StoreUnavailable(err.to_string())
        } else {
            CacheError::StoreOperationFailed(err.to_string())
        }
    }
}

pub type Result<T, E = CacheError> = std::result::Result<T, E>;
