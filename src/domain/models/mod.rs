//! Domain models.

pub mod config;
pub mod invocation;

pub use config::{CachePolicyConfig, Config, Lifetime, ServiceDescriptor, ServiceGroups};
pub use invocation::{
    CachePolicy, InterfaceDescriptor, Invocation, MethodDescriptor, DEFAULT_SLIDING_WINDOW,
};
