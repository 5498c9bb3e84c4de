//! Entwine - Interception Chains for Resolved Services
//!
//! Entwine builds runtime call-interception chains around services declared
//! in configuration: a base implementation is wrapped in zero or more
//! ordered behaviors (memoized caching, invocation logging) without the
//! implementation knowing. Each behavior's own dependencies are auto-wired
//! by capability-type matching.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): descriptors, invocations, errors, and the
//!   trait seams (`Callable`, `Interceptor`, `CacheStore`, `TraceSink`)
//! - **Service Layer** (`services`): dispatch, wrapping, the capability
//!   resolver, and the chain builder
//! - **Behaviors** (`behaviors`): the concrete caching and logging
//!   interceptors
//! - **Infrastructure Layer** (`infrastructure`): configuration loading,
//!   the moka-backed cache store, trace sinks
//!
//! # Example
//!
//! ```ignore
//! use entwine::{ChainBuilder, ServiceRegistry, CapabilityMap};
//!
//! fn main() -> anyhow::Result<()> {
//!     // Register interfaces, implementations, and behaviors, then build
//!     // chains from loaded service descriptors.
//!     Ok(())
//! }
//! ```

pub mod behaviors;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use behaviors::{
    CachingBehavior, CachingBehaviorFactory, LoggingBehavior, LoggingBehaviorFactory,
};
pub use domain::capability::{CapabilitySlot, DependencySet};
pub use domain::errors::{CallError, CallResult, ChainError, ChainResult};
pub use domain::models::{
    CachePolicy, CachePolicyConfig, Config, InterfaceDescriptor, Invocation, Lifetime,
    MethodDescriptor, ServiceDescriptor, ServiceGroups, DEFAULT_SLIDING_WINDOW,
};
pub use domain::ports::{
    BehaviorFactory, CacheStore, Callable, Interceptor, TraceLevel, TraceSink,
};
pub use infrastructure::cache::MemoryCacheStore;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::trace::{ConsoleSink, TracingSink};
pub use services::{CapabilityMap, ChainBuilder, Dispatcher, ServiceRegistry};
