//! Memoizing cache behavior.
//!
//! Methods carrying a [`CachePolicy`] get their results memoized in the
//! injected [`CacheStore`] under either the policy's explicit key or a key
//! derived deterministically from the call signature. Methods without a
//! policy pass straight through to the target.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::behaviors::emit;
use crate::domain::capability::{CapabilitySlot, DependencySet};
use crate::domain::errors::{CallError, CallResult, ChainResult};
use crate::domain::models::invocation::Invocation;
use crate::domain::ports::{
    BehaviorFactory, CacheStore, Callable, Interceptor, TraceLevel, TraceSink,
};
use crate::services::interception;

/// Behavior identifier used in service descriptors.
pub const CACHING_BEHAVIOR_ID: &str = "Caching";

/// Interceptor memoizing per-method results with sliding expiration.
///
/// The cache map lives in the injected store, so every chain sharing the
/// store shares its entries; concurrency safety is the store's contract.
pub struct CachingBehavior {
    store: Option<Arc<dyn CacheStore>>,
    sink: Option<Arc<dyn TraceSink>>,
    process_token: String,
}

impl Default for CachingBehavior {
    /// Dependency-free construction path; slots are filled during wrapping.
    fn default() -> Self {
        Self {
            store: None,
            sink: None,
            process_token: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

impl CachingBehavior {
    /// Dependency-carrying construction path. Equivalent to the default
    /// path once wrapping has injected the same store.
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store: Some(store),
            ..Self::default()
        }
    }

    fn trace(&self, level: TraceLevel, message: &str) {
        emit(self.sink.as_ref(), level, message);
    }

    /// Derive a deterministic key from the call signature.
    ///
    /// Concatenates the process token, the qualified method name, and each
    /// parameter name with the string form of its argument (element-wise for
    /// sequences, in iteration order), then digests the result so keys stay
    /// short and printable.
    fn derive_key(&self, invocation: &Invocation) -> String {
        STANDARD.encode(Sha256::digest(self.signature(invocation).as_bytes()))
    }

    /// The raw concatenated signature the key is digested from.
    fn signature(&self, invocation: &Invocation) -> String {
        let method = &invocation.method;
        let mut signature = String::new();
        signature.push('_');
        signature.push_str(&self.process_token);
        signature.push('_');
        signature.push_str(&method.interface);
        signature.push('.');
        signature.push_str(&method.name);

        for (position, param) in method.params.iter().enumerate() {
            signature.push_str("_[");
            signature.push_str(param);
            match invocation.arg(position) {
                Value::Array(items) => {
                    for item in items {
                        signature.push_str(&scalar_repr(item));
                    }
                }
                scalar => signature.push_str(&scalar_repr(scalar)),
            }
            signature.push(']');
        }

        signature
    }
}

/// String form of a single argument or sequence element.
fn scalar_repr(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl Interceptor for CachingBehavior {
    fn name(&self) -> &'static str {
        CACHING_BEHAVIOR_ID
    }

    fn intercept(&self, invocation: &Invocation, target: &dyn Callable) -> CallResult {
        let Some(policy) = invocation.method.cache.clone() else {
            self.trace(
                TraceLevel::Debug,
                &format!(
                    "no caching policy on {}; invoking target",
                    invocation.method.qualified_name()
                ),
            );
            return target.call(invocation);
        };

        // An explicit key shadows the arguments: every argument variant
        // lands on the same cache slot.
        let key = policy
            .key
            .unwrap_or_else(|| self.derive_key(invocation));
        self.trace(TraceLevel::Debug, &format!("cache key: {key}"));

        let store = self
            .store
            .as_ref()
            .ok_or_else(|| CallError::Service("caching behavior has no cache store".into()))?;

        store.get_or_create(&key, policy.window, &mut || {
            self.trace(TraceLevel::Debug, "not found in cache; invoking target");
            target.call(invocation)
        })
    }

    fn inject(&mut self, dependencies: &DependencySet) {
        if self.store.is_none() {
            self.store = dependencies.first_of::<Arc<dyn CacheStore>>();
        }
        if self.sink.is_none() {
            self.sink = dependencies.first_of::<Arc<dyn TraceSink>>();
        }
    }
}

/// Factory registered under [`CACHING_BEHAVIOR_ID`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CachingBehaviorFactory;

impl BehaviorFactory for CachingBehaviorFactory {
    fn id(&self) -> &'static str {
        CACHING_BEHAVIOR_ID
    }

    fn slots(&self) -> Vec<CapabilitySlot> {
        vec![
            CapabilitySlot::required::<Arc<dyn CacheStore>>("cache-store"),
            CapabilitySlot::optional::<Arc<dyn TraceSink>>("trace-sink"),
        ]
    }

    fn wrap(
        &self,
        original: Option<Arc<dyn Callable>>,
        dependencies: &DependencySet,
    ) -> ChainResult<Arc<dyn Callable>> {
        dependencies.check_required(&self.slots())?;
        interception::wrap(CachingBehavior::default(), original, dependencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::invocation::{CachePolicy, InterfaceDescriptor};
    use crate::infrastructure::cache::MemoryCacheStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn invocation(args: Vec<Value>) -> Invocation {
        let iface = InterfaceDescriptor::builder("demo.Demo")
            .method("run", &["value", "more"])
            .build();
        Invocation::new(iface.method("run").unwrap().clone(), args)
    }

    fn cached_invocation(args: Vec<Value>) -> Invocation {
        let iface = InterfaceDescriptor::builder("demo.Demo")
            .cached_method("run", &["value", "more"], CachePolicy::automatic())
            .build();
        Invocation::new(iface.method("run").unwrap().clone(), args)
    }

    struct CountingTarget {
        calls: Arc<AtomicUsize>,
    }

    impl Callable for CountingTarget {
        fn call(&self, _invocation: &Invocation) -> CallResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!(7))
        }
    }

    #[test]
    fn test_key_is_deterministic() {
        let behavior = CachingBehavior::default();
        let a = behavior.derive_key(&invocation(vec![json!(2), json!([1, 2, 3])]));
        let b = behavior.derive_key(&invocation(vec![json!(2), json!([1, 2, 3])]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_permuted_sequence_changes_key() {
        let behavior = CachingBehavior::default();
        let a = behavior.derive_key(&invocation(vec![json!(2), json!([1, 2, 3])]));
        let b = behavior.derive_key(&invocation(vec![json!(2), json!([3, 2, 1])]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_signature_layout() {
        let behavior = CachingBehavior::default();
        let signature = behavior.signature(&invocation(vec![json!(2), json!([1, 2, 3])]));
        assert_eq!(signature, "_entwine_demo.Demo.run_[value2]_[more123]");
    }

    #[test]
    fn test_null_and_empty_sequence_args() {
        let behavior = CachingBehavior::default();
        // Neither a null argument, a missing argument, nor an empty sequence
        // may fault derivation; null and missing render identically.
        let with_null = behavior.signature(&invocation(vec![Value::Null, json!([])]));
        let missing = behavior.signature(&invocation(vec![]));
        assert_eq!(with_null, "_entwine_demo.Demo.run_[value]_[more]");
        assert_eq!(with_null, missing);
    }

    #[test]
    fn test_strings_unquoted_and_not_iterated() {
        let behavior = CachingBehavior::default();
        let signature = behavior.signature(&invocation(vec![json!("two"), json!(true)]));
        assert_eq!(signature, "_entwine_demo.Demo.run_[valuetwo]_[moretrue]");
    }

    #[test]
    fn test_construction_paths_are_equivalent() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let call = cached_invocation(vec![json!(2), json!([1, 2, 3])]);

        // Dependency-carrying path: the store goes in at construction, no
        // injection needed.
        let direct = interception::wrap(
            CachingBehavior::new(store.clone()),
            Some(Arc::new(CountingTarget {
                calls: calls.clone(),
            })),
            &DependencySet::new(),
        )
        .unwrap();
        assert_eq!(direct.call(&call).unwrap(), json!(7));
        assert_eq!(direct.call(&call).unwrap(), json!(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Default-plus-inject path with the same store: the chains behave as
        // one, so the earlier entry satisfies this chain's first call too.
        let mut dependencies = DependencySet::new();
        dependencies.push(store);
        let injected = CachingBehaviorFactory
            .wrap(
                Some(Arc::new(CountingTarget {
                    calls: calls.clone(),
                })),
                &dependencies,
            )
            .unwrap();
        assert_eq!(injected.call(&call).unwrap(), json!(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_key_is_printable_base64() {
        let behavior = CachingBehavior::default();
        let key = behavior.derive_key(&invocation(vec![json!(2), json!([1, 2, 3])]));
        assert_eq!(key.len(), 44);
        assert!(key.is_ascii());
    }
}
