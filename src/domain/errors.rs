//! Domain errors for chain construction and call dispatch.

use thiserror::Error;

/// Errors raised while building an interception chain from configuration.
///
/// All variants are fatal at build time: a misconfigured descriptor must
/// never produce a partially wrapped service.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Interface not registered: {0}")]
    UnknownInterface(String),

    #[error("Implementation not registered: {0}")]
    UnknownImplementation(String),

    #[error("Implementation {implementation} does not satisfy interface {interface}")]
    ImplementationMismatch {
        implementation: String,
        interface: String,
    },

    #[error("Interception behavior not registered: {0}")]
    UnknownBehavior(String),

    #[error("wrap called without an original instance")]
    MissingOriginal,

    #[error("No registered instance satisfies capability {0}")]
    UnresolvedDependency(String),

    #[error("Malformed service descriptor: {0}")]
    MalformedDescriptor(String),
}

/// Result alias for chain-building operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Errors raised while dispatching a call through a chain.
///
/// `Clone` is required because a fault produced under a shared cache
/// get-or-create is observed by every collapsed caller.
#[derive(Debug, Clone, Error)]
pub enum CallError {
    #[error("Interface {interface} has no method named {method}")]
    UnknownMethod { interface: String, method: String },

    #[error("Argument {position} of {method} has the wrong shape: expected {expected}")]
    ArgumentMismatch {
        method: String,
        position: usize,
        expected: &'static str,
    },

    #[error("{0}")]
    Service(String),

    #[error("Invocation target faulted: {source}")]
    Dispatch {
        #[source]
        source: Box<CallError>,
    },
}

/// Result alias for a dispatched call.
pub type CallResult = Result<serde_json::Value, CallError>;
