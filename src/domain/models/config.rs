//! Declarative service configuration.
//!
//! Mirrors the on-disk schema: a `services` section with three lifetime
//! groups, each an ordered list of service descriptors, plus an optional
//! `cache_policies` side table keyed by qualified method name
//! (`interface::method`).

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::models::invocation::{CachePolicy, DEFAULT_SLIDING_WINDOW};

/// Lifetime policy a descriptor's group assigns to the built chain.
///
/// Lifetimes are storage policies of the external resolver; chain building
/// is identical across groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// One shared chain instance.
    Singleton,
    /// A fresh chain per resolution.
    Transient,
    /// One chain per scope.
    Scoped,
}

impl std::fmt::Display for Lifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Singleton => write!(f, "singleton"),
            Self::Transient => write!(f, "transient"),
            Self::Scoped => write!(f, "scoped"),
        }
    }
}

/// One service registration: interface, implementation, and the ordered
/// interception behaviors wrapped around it.
///
/// Behaviors are applied first to last, so the first listed behavior is the
/// innermost wrapper and the last listed is the outermost.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Registered interface name.
    pub interface: String,
    /// Registered implementation name.
    pub implementation: String,
    /// Ordered behavior identifiers, innermost first.
    #[serde(default)]
    pub interception_behaviors: Vec<String>,
}

/// The three lifetime groups of service descriptors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceGroups {
    /// Shared, process-wide services.
    #[serde(default)]
    pub singleton: Vec<ServiceDescriptor>,
    /// Per-resolution services.
    #[serde(default)]
    pub transient: Vec<ServiceDescriptor>,
    /// Per-scope services.
    #[serde(default)]
    pub scoped: Vec<ServiceDescriptor>,
}

impl ServiceGroups {
    /// Iterate all descriptors with their lifetime tag, singleton first.
    pub fn iter(&self) -> impl Iterator<Item = (Lifetime, &ServiceDescriptor)> {
        self.singleton
            .iter()
            .map(|d| (Lifetime::Singleton, d))
            .chain(self.transient.iter().map(|d| (Lifetime::Transient, d)))
            .chain(self.scoped.iter().map(|d| (Lifetime::Scoped, d)))
    }

    /// Whether no descriptors are declared in any group.
    pub fn is_empty(&self) -> bool {
        self.singleton.is_empty() && self.transient.is_empty() && self.scoped.is_empty()
    }
}

/// Configured caching policy for one method.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CachePolicyConfig {
    /// Explicit cache key; omit for automatic key derivation.
    #[serde(default)]
    pub key: Option<String>,
    /// Sliding window in seconds; omit for the default window.
    #[serde(default)]
    pub window_secs: Option<u64>,
}

impl CachePolicyConfig {
    /// Convert into the domain policy.
    pub fn to_policy(&self) -> CachePolicy {
        CachePolicy {
            key: self.key.clone(),
            window: self
                .window_secs
                .map_or(DEFAULT_SLIDING_WINDOW, Duration::from_secs),
        }
    }
}

/// Root configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Service registrations by lifetime group.
    #[serde(default)]
    pub services: ServiceGroups,
    /// Caching policies keyed by qualified method name.
    #[serde(default)]
    pub cache_policies: HashMap<String, CachePolicyConfig>,
}
