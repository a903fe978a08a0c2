use std::fmt;

use tracing::error;

use crate::error::CacheError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Put,
    Get,
    Remove,
    Clear,
    Size,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Put => "put",
            Operation::Get => "get",
            Operation::Remove => "remove",
            Operation::Clear => "clear",
            Operation::Size => "size",
        })
    }
}

/// A store error swallowed by one of the total cache operations.
#[derive(Debug)]
pub struct Failure<'a> {
    pub operation: Operation,
    pub namespace: &'a str,
    /// Stringified key, absent for namespace-wide operations.
    pub field: Option<&'a str>,
    pub error: &'a CacheError,
}

/// Receives every error the total cache operations swallow.
///
/// Called synchronously on the failing task, after which the operation
/// returns its safe default.
pub trait FailureHandler: Send + Sync {
    fn on_failure(&self, failure: &Failure<'_>);
}

/// Default handler: one `error!` event per failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFailures;

impl FailureHandler for LogFailures {
    fn on_failure(&self, failure: &Failure<'_>) {
        error!(
            namespace = failure.namespace,
            key = failure.field,
            operation = %failure.operation,
            error = %failure.error,
            "cache {} failed",
            failure.operation,
        );
    }
}
