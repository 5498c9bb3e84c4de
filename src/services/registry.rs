//! Name-to-constructible-type registry.
//!
//! Maps the logical identifiers configuration speaks in (interface names,
//! implementation names, behavior identifiers) to things the chain builder
//! can construct: interface descriptors, implementation factories with their
//! declared constructor capabilities, and behavior factories.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::capability::{CapabilitySlot, DependencySet};
use crate::domain::errors::{ChainError, ChainResult};
use crate::domain::models::config::CachePolicyConfig;
use crate::domain::models::invocation::InterfaceDescriptor;
use crate::domain::ports::{BehaviorFactory, Callable};

type ImplementationFn =
    Box<dyn Fn(&DependencySet) -> ChainResult<Arc<dyn Callable>> + Send + Sync>;

/// A registered implementation: the interface it satisfies, the constructor
/// capabilities it wants, and the factory that builds it.
pub struct ImplementationEntry {
    interface: String,
    slots: Vec<CapabilitySlot>,
    factory: ImplementationFn,
}

impl ImplementationEntry {
    /// Interface this implementation satisfies.
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Declared constructor capability slots.
    pub fn slots(&self) -> &[CapabilitySlot] {
        &self.slots
    }

    /// Construct the base instance from resolved dependencies.
    pub fn construct(&self, dependencies: &DependencySet) -> ChainResult<Arc<dyn Callable>> {
        (self.factory)(dependencies)
    }
}

/// Central registry of interfaces, implementations, and behaviors.
#[derive(Default)]
pub struct ServiceRegistry {
    interfaces: HashMap<String, Arc<InterfaceDescriptor>>,
    implementations: HashMap<String, ImplementationEntry>,
    behaviors: HashMap<&'static str, Arc<dyn BehaviorFactory>>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an interface descriptor under its own name.
    pub fn register_interface(&mut self, descriptor: InterfaceDescriptor) -> &mut Self {
        self.interfaces
            .insert(descriptor.name.clone(), Arc::new(descriptor));
        self
    }

    /// Register an implementation for `interface` under `name`.
    ///
    /// `slots` declare the constructor capabilities resolved at build time
    /// and handed to `factory` as an ordered dependency set.
    pub fn register_implementation(
        &mut self,
        name: impl Into<String>,
        interface: impl Into<String>,
        slots: Vec<CapabilitySlot>,
        factory: impl Fn(&DependencySet) -> ChainResult<Arc<dyn Callable>> + Send + Sync + 'static,
    ) -> &mut Self {
        self.implementations.insert(
            name.into(),
            ImplementationEntry {
                interface: interface.into(),
                slots,
                factory: Box::new(factory),
            },
        );
        self
    }

    /// Register a behavior factory under its identifier.
    pub fn register_behavior(&mut self, factory: impl BehaviorFactory + 'static) -> &mut Self {
        self.behaviors.insert(factory.id(), Arc::new(factory));
        self
    }

    /// Look up an interface descriptor.
    pub fn interface(&self, name: &str) -> ChainResult<Arc<InterfaceDescriptor>> {
        self.interfaces
            .get(name)
            .cloned()
            .ok_or_else(|| ChainError::UnknownInterface(name.to_string()))
    }

    /// Look up an implementation entry.
    pub fn implementation(&self, name: &str) -> ChainResult<&ImplementationEntry> {
        self.implementations
            .get(name)
            .ok_or_else(|| ChainError::UnknownImplementation(name.to_string()))
    }

    /// Look up a behavior factory.
    pub fn behavior(&self, id: &str) -> ChainResult<Arc<dyn BehaviorFactory>> {
        self.behaviors
            .get(id)
            .cloned()
            .ok_or_else(|| ChainError::UnknownBehavior(id.to_string()))
    }

    /// Attach configured cache policies to registered interface methods.
    ///
    /// Keys are qualified method names, `interface::method`. Unknown
    /// interfaces or methods are configuration mistakes and fail loudly.
    pub fn apply_cache_policies(
        &mut self,
        policies: &HashMap<String, CachePolicyConfig>,
    ) -> ChainResult<()> {
        for (target, config) in policies {
            let (interface, method) = target.split_once("::").ok_or_else(|| {
                ChainError::MalformedDescriptor(format!(
                    "cache policy target {target} is not interface::method"
                ))
            })?;

            let descriptor = self
                .interfaces
                .get_mut(interface)
                .ok_or_else(|| ChainError::UnknownInterface(interface.to_string()))?;

            Arc::make_mut(descriptor)
                .method_mut(method)
                .ok_or_else(|| {
                    ChainError::MalformedDescriptor(format!(
                        "cache policy target {target} names an unknown method"
                    ))
                })?
                .cache = Some(config.to_policy());
        }
        Ok(())
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("interfaces", &self.interfaces.keys().collect::<Vec<_>>())
            .field(
                "implementations",
                &self.implementations.keys().collect::<Vec<_>>(),
            )
            .field("behaviors", &self.behaviors.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::invocation::DEFAULT_SLIDING_WINDOW;

    fn registry_with_interface() -> ServiceRegistry {
        let mut registry = ServiceRegistry::new();
        registry.register_interface(
            InterfaceDescriptor::builder("demo.Demo")
                .method("run", &["value"])
                .build(),
        );
        registry
    }

    #[test]
    fn test_unknown_lookups() {
        let registry = ServiceRegistry::new();
        assert!(matches!(
            registry.interface("nope"),
            Err(ChainError::UnknownInterface(_))
        ));
        assert!(matches!(
            registry.implementation("nope"),
            Err(ChainError::UnknownImplementation(_))
        ));
        assert!(matches!(
            registry.behavior("nope"),
            Err(ChainError::UnknownBehavior(_))
        ));
    }

    #[test]
    fn test_apply_cache_policies() {
        let mut registry = registry_with_interface();
        let mut policies = HashMap::new();
        policies.insert(
            "demo.Demo::run".to_string(),
            CachePolicyConfig {
                key: Some("someKey".into()),
                window_secs: None,
            },
        );

        registry.apply_cache_policies(&policies).unwrap();

        let iface = registry.interface("demo.Demo").unwrap();
        let policy = iface.method("run").unwrap().cache.as_ref().unwrap();
        assert_eq!(policy.key.as_deref(), Some("someKey"));
        assert_eq!(policy.window, DEFAULT_SLIDING_WINDOW);
    }

    #[test]
    fn test_apply_cache_policies_rejects_bad_targets() {
        let mut registry = registry_with_interface();

        let mut malformed = HashMap::new();
        malformed.insert("demo.Demo.run".to_string(), CachePolicyConfig::default());
        assert!(matches!(
            registry.apply_cache_policies(&malformed),
            Err(ChainError::MalformedDescriptor(_))
        ));

        let mut unknown_method = HashMap::new();
        unknown_method.insert("demo.Demo::walk".to_string(), CachePolicyConfig::default());
        assert!(matches!(
            registry.apply_cache_policies(&unknown_method),
            Err(ChainError::MalformedDescriptor(_))
        ));
    }
}
