//! Capability-type dependency resolver.
//!
//! A small registry mapping capability type to a shared instance, emulating
//! container auto-wiring without runtime introspection: consumers resolve by
//! the handle type they hold (e.g. `Arc<dyn CacheStore>`), not by name or
//! position.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::domain::capability::{CapabilitySlot, DependencySet};
use crate::domain::errors::{ChainError, ChainResult};

/// Registry of dependency instances keyed by capability type.
#[derive(Default)]
pub struct CapabilityMap {
    entries: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl CapabilityMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `instance` under its capability type `C`, replacing any
    /// previous registration for the same capability.
    pub fn provide<C: Any + Send + Sync>(&mut self, instance: C) -> &mut Self {
        self.entries.insert(TypeId::of::<C>(), Arc::new(instance));
        self
    }

    /// Resolve an instance of capability `C`, cloned out of the map.
    ///
    /// `capability` only labels the error when nothing is registered.
    pub fn resolve<C: Any + Clone>(&self, capability: &str) -> ChainResult<C> {
        self.entries
            .get(&TypeId::of::<C>())
            .and_then(|entry| entry.downcast_ref::<C>().cloned())
            .ok_or_else(|| ChainError::UnresolvedDependency(capability.to_string()))
    }

    /// Whether the capability type `C` is registered.
    pub fn contains<C: Any>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<C>())
    }

    /// Resolve `slots` into an ordered dependency set.
    ///
    /// A missing required slot fails the whole collection with
    /// [`ChainError::UnresolvedDependency`]; missing optional slots are
    /// skipped so the consumer's slot simply remains unset.
    pub fn collect(&self, slots: &[CapabilitySlot]) -> ChainResult<DependencySet> {
        let mut set = DependencySet::new();
        for slot in slots {
            match self.entries.get(&slot.type_id) {
                Some(entry) => set.push_raw(entry.clone()),
                None if slot.required => {
                    return Err(ChainError::UnresolvedDependency(slot.name.to_string()));
                }
                None => {
                    debug!(capability = slot.name, "optional capability not registered");
                }
            }
        }
        Ok(set)
    }
}

impl std::fmt::Debug for CapabilityMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityMap")
            .field("capabilities", &self.entries.len())
            .finish()
    }
}
