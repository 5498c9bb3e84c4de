//! Capability-typed dependency slots and the ordered set they match against.
//!
//! A behavior declares its dependencies as [`CapabilitySlot`]s. At build time
//! the slots are resolved into a [`DependencySet`], an ordered list of
//! type-erased instances. Injection scans the set front to back and takes the
//! first instance whose capability type matches the slot; unmatched slots stay
//! unset and unmatched instances are silently dropped.

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::domain::errors::{ChainError, ChainResult};

/// A typed dependency slot declared by a behavior or implementation factory.
///
/// The capability type is the handle a consumer actually holds, e.g.
/// `Arc<dyn CacheStore>`, so matching is by the trait seam rather than by a
/// concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilitySlot {
    /// Human-readable capability name, used in error messages.
    pub name: &'static str,
    /// Type id of the capability handle.
    pub type_id: TypeId,
    /// Whether an unresolved slot fails the build.
    pub required: bool,
}

impl CapabilitySlot {
    /// Declare a slot whose absence fails chain building.
    pub fn required<C: Any>(name: &'static str) -> Self {
        Self {
            name,
            type_id: TypeId::of::<C>(),
            required: true,
        }
    }

    /// Declare a slot that may remain unset.
    pub fn optional<C: Any>(name: &'static str) -> Self {
        Self {
            name,
            type_id: TypeId::of::<C>(),
            required: false,
        }
    }
}

/// An ordered collection of type-erased dependency instances.
///
/// Instances are stored behind `Arc` so a set can be cloned cheaply and the
/// same instance shared across every slot it matches.
#[derive(Default, Clone)]
pub struct DependencySet {
    entries: Vec<Arc<dyn Any + Send + Sync>>,
}

impl DependencySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instance, preserving insertion order.
    pub fn push<C: Any + Send + Sync>(&mut self, instance: C) -> &mut Self {
        self.entries.push(Arc::new(instance));
        self
    }

    /// Append an already type-erased instance.
    pub(crate) fn push_raw(&mut self, instance: Arc<dyn Any + Send + Sync>) {
        self.entries.push(instance);
    }

    /// First instance matching capability type `C`, cloned out of the set.
    ///
    /// Returns `None` when nothing in the set satisfies the capability.
    pub fn first_of<C: Any + Clone>(&self) -> Option<C> {
        self.entries
            .iter()
            .find_map(|entry| entry.downcast_ref::<C>().cloned())
    }

    /// Whether any entry matches the given slot's capability type.
    pub fn satisfies(&self, slot: &CapabilitySlot) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.as_ref().type_id() == slot.type_id)
    }

    /// Number of instances in the set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no instances.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fail unless every required slot is satisfied by some entry.
    pub fn check_required(&self, slots: &[CapabilitySlot]) -> ChainResult<()> {
        for slot in slots {
            if slot.required && !self.satisfies(slot) {
                return Err(ChainError::UnresolvedDependency(slot.name.to_string()));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for DependencySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencySet")
            .field("len", &self.entries.len())
            .finish()
    }
}
