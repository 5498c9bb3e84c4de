//! Builds interception chains from service descriptors.
//!
//! Behaviors are applied in declaration order, each wrapping the current
//! chain head, so the first declared behavior ends up innermost and the last
//! declared outermost. Everything a descriptor names is resolved before any
//! object is constructed: a misconfigured descriptor fails the build and
//! constructs nothing.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::capability::DependencySet;
use crate::domain::errors::{ChainError, ChainResult};
use crate::domain::models::config::ServiceDescriptor;
use crate::domain::ports::{BehaviorFactory, Callable};
use crate::services::capability_map::CapabilityMap;
use crate::services::registry::ServiceRegistry;

/// Chain builder bound to a registry and a capability resolver.
///
/// Building is pure and repeatable: the same descriptor always yields a
/// freshly constructed chain with no other side effects, so the external
/// resolver may invoke it under any lifetime policy.
pub struct ChainBuilder {
    registry: Arc<ServiceRegistry>,
    resolver: Arc<CapabilityMap>,
}

impl ChainBuilder {
    /// Create a builder over `registry` resolving capabilities from
    /// `resolver`.
    pub fn new(registry: Arc<ServiceRegistry>, resolver: Arc<CapabilityMap>) -> Self {
        Self { registry, resolver }
    }

    /// Build the fully wrapped service a descriptor declares.
    #[instrument(skip(self), fields(interface = %descriptor.interface))]
    pub fn build(&self, descriptor: &ServiceDescriptor) -> ChainResult<Arc<dyn Callable>> {
        validate(descriptor)?;

        // Resolve every name up front so nothing is constructed on failure.
        self.registry.interface(&descriptor.interface)?;
        let entry = self.registry.implementation(&descriptor.implementation)?;
        if entry.interface() != descriptor.interface {
            return Err(ChainError::ImplementationMismatch {
                implementation: descriptor.implementation.clone(),
                interface: descriptor.interface.clone(),
            });
        }
        let base_dependencies = self.resolver.collect(entry.slots())?;
        let links = self.resolve_behaviors(&descriptor.interception_behaviors)?;

        let base = entry.construct(&base_dependencies)?;
        debug!(implementation = %descriptor.implementation, "constructed base instance");

        wrap_links(base, links)
    }

    /// Wrap an existing instance with the given behavior identifiers, in
    /// order. The descriptor-driven [`build`](Self::build) funnels through
    /// the same path.
    pub fn wrap_behaviors(
        &self,
        base: Arc<dyn Callable>,
        behavior_ids: &[String],
    ) -> ChainResult<Arc<dyn Callable>> {
        let links = self.resolve_behaviors(behavior_ids)?;
        wrap_links(base, links)
    }

    /// Resolve each behavior identifier to its factory and dependency set.
    fn resolve_behaviors(
        &self,
        behavior_ids: &[String],
    ) -> ChainResult<Vec<(Arc<dyn BehaviorFactory>, DependencySet)>> {
        behavior_ids
            .iter()
            .map(|id| {
                let factory = self.registry.behavior(id)?;
                let dependencies = self.resolver.collect(&factory.slots())?;
                Ok((factory, dependencies))
            })
            .collect()
    }
}

impl std::fmt::Debug for ChainBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainBuilder")
            .field("registry", &self.registry)
            .field("resolver", &self.resolver)
            .finish()
    }
}

fn wrap_links(
    base: Arc<dyn Callable>,
    links: Vec<(Arc<dyn BehaviorFactory>, DependencySet)>,
) -> ChainResult<Arc<dyn Callable>> {
    let mut head = base;
    for (factory, dependencies) in links {
        head = factory.wrap(Some(head), &dependencies)?;
        debug!(behavior = factory.id(), "wrapped chain head");
    }
    Ok(head)
}

fn validate(descriptor: &ServiceDescriptor) -> ChainResult<()> {
    if descriptor.interface.is_empty() {
        return Err(ChainError::MalformedDescriptor(
            "empty interface name".to_string(),
        ));
    }
    if descriptor.implementation.is_empty() {
        return Err(ChainError::MalformedDescriptor(
            "empty implementation name".to_string(),
        ));
    }
    if let Some(position) = descriptor
        .interception_behaviors
        .iter()
        .position(String::is_empty)
    {
        return Err(ChainError::MalformedDescriptor(format!(
            "empty behavior identifier at position {position}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_fields() {
        let empty_interface = ServiceDescriptor {
            interface: String::new(),
            implementation: "impl".into(),
            interception_behaviors: vec![],
        };
        assert!(matches!(
            validate(&empty_interface),
            Err(ChainError::MalformedDescriptor(_))
        ));

        let empty_behavior = ServiceDescriptor {
            interface: "iface".into(),
            implementation: "impl".into(),
            interception_behaviors: vec!["Logging".into(), String::new()],
        };
        assert!(matches!(
            validate(&empty_behavior),
            Err(ChainError::MalformedDescriptor(msg)) if msg.contains("position 1")
        ));
    }
}
