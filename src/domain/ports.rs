//! Trait seams between the composition engine and its collaborators.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::capability::{CapabilitySlot, DependencySet};
use crate::domain::errors::{CallResult, ChainResult};
use crate::domain::models::invocation::Invocation;

/// Anything a call can be routed through: a base implementation or any link
/// of an interception chain. The wrapped object handed back by the chain
/// builder satisfies this same contract, so callers cannot tell it apart
/// from the original.
pub trait Callable: Send + Sync {
    /// Dispatch one invocation.
    fn call(&self, invocation: &Invocation) -> CallResult;
}

/// An interception behavior: one overridable around-call hook plus
/// dependency slots filled by capability match during wrapping.
///
/// The default hook forwards unchanged, which is the contract every concrete
/// behavior must preserve for methods it does not give special semantics.
pub trait Interceptor: Send + Sync {
    /// Behavior name used in traces.
    fn name(&self) -> &'static str {
        "interceptor"
    }

    /// Around-call hook. `target` is the next link in the chain.
    fn intercept(&self, invocation: &Invocation, target: &dyn Callable) -> CallResult {
        target.call(invocation)
    }

    /// Fill declared dependency slots from the set, first match per slot.
    /// Slots already set by a dependency-carrying constructor are kept.
    fn inject(&mut self, _dependencies: &DependencySet) {}
}

/// Constructs and wraps one behavior type; the constructible target a
/// behavior identifier resolves to.
pub trait BehaviorFactory: Send + Sync {
    /// Identifier the factory is registered under.
    fn id(&self) -> &'static str;

    /// Dependency slots the behavior wants resolved at build time.
    fn slots(&self) -> Vec<CapabilitySlot>;

    /// Construct the behavior through its dependency-free path, inject
    /// `dependencies`, and wrap it around `original`.
    ///
    /// Fails with [`ChainError::MissingOriginal`] when `original` is `None`.
    ///
    /// [`ChainError::MissingOriginal`]: crate::domain::errors::ChainError::MissingOriginal
    fn wrap(
        &self,
        original: Option<Arc<dyn Callable>>,
        dependencies: &DependencySet,
    ) -> ChainResult<Arc<dyn Callable>>;
}

/// TTL-keyed cache store consumed by the caching behavior.
///
/// Implementations must support concurrent get-or-create on the same key
/// without corruption; collapsing concurrent identical misses onto a single
/// producer run is the expected contract.
pub trait CacheStore: Send + Sync {
    /// Return the live entry under `key`, or run `producer`, store its
    /// successful result with a sliding `window`, and return it. Faults are
    /// propagated and never stored.
    fn get_or_create(
        &self,
        key: &str,
        window: Duration,
        producer: &mut dyn FnMut() -> CallResult,
    ) -> CallResult;
}

/// Severity of a trace message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceLevel {
    /// Diagnostic chatter (cache keys, miss notices).
    Debug,
    /// Call progress.
    Info,
    /// Suspicious but non-fatal conditions.
    Warn,
    /// Call faults.
    Error,
}

/// Sink for leveled trace messages emitted by behaviors. Purely
/// observational; correctness never depends on what a sink does.
pub trait TraceSink: Send + Sync {
    /// Emit one message.
    fn emit(&self, level: TraceLevel, message: &str);
}
