//! Method and invocation descriptors.
//!
//! A call through a chain is represented as an [`Invocation`]: the
//! [`MethodDescriptor`] being invoked plus its arguments in declaration
//! order, carried as `serde_json::Value` so behaviors can inspect them
//! without knowing the concrete signature. Invocations are created per call
//! and discarded when the call returns or faults.

use std::time::Duration;

use serde_json::Value;

use crate::domain::errors::CallError;

/// Default sliding expiration window for cached results.
pub const DEFAULT_SLIDING_WINDOW: Duration = Duration::from_secs(100);

/// Caching policy attached to a method.
///
/// The explicit side table replacing per-method attributes: a policy is
/// attached at interface registration time or supplied through
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    /// Explicit cache key. When present it is used verbatim and the call
    /// arguments are ignored for key purposes, intentionally coalescing all
    /// argument variants onto one cache slot.
    pub key: Option<String>,
    /// Sliding expiration window measured from last access.
    pub window: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            key: None,
            window: DEFAULT_SLIDING_WINDOW,
        }
    }
}

impl CachePolicy {
    /// Policy with an automatically derived key.
    pub fn automatic() -> Self {
        Self::default()
    }

    /// Policy with an explicit, argument-shadowing key.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Override the sliding window.
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }
}

/// Describes one method of a registered interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Fully qualified interface name the method belongs to.
    pub interface: String,
    /// Method name.
    pub name: String,
    /// Parameter names in declaration order.
    pub params: Vec<String>,
    /// Optional caching policy. `None` means calls are never memoized.
    pub cache: Option<CachePolicy>,
}

impl MethodDescriptor {
    /// Fully qualified method identifier, `interface::method`.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.interface, self.name)
    }
}

/// Describes a registered interface: its fully qualified name and methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    /// Fully qualified interface name.
    pub name: String,
    /// Declared methods.
    pub methods: Vec<MethodDescriptor>,
}

impl InterfaceDescriptor {
    /// Start building an interface descriptor.
    pub fn builder(name: impl Into<String>) -> InterfaceBuilder {
        InterfaceBuilder {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Look up a method by name.
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Mutable method lookup, used when attaching configured cache policies.
    pub fn method_mut(&mut self, name: &str) -> Option<&mut MethodDescriptor> {
        self.methods.iter_mut().find(|m| m.name == name)
    }
}

/// Fluent builder for [`InterfaceDescriptor`].
#[derive(Debug)]
pub struct InterfaceBuilder {
    name: String,
    methods: Vec<MethodDescriptor>,
}

impl InterfaceBuilder {
    /// Add a method without a caching policy.
    pub fn method(self, name: impl Into<String>, params: &[&str]) -> Self {
        self.method_with_policy(name, params, None)
    }

    /// Add a method carrying a caching policy.
    pub fn cached_method(
        self,
        name: impl Into<String>,
        params: &[&str],
        policy: CachePolicy,
    ) -> Self {
        self.method_with_policy(name, params, Some(policy))
    }

    fn method_with_policy(
        mut self,
        name: impl Into<String>,
        params: &[&str],
        cache: Option<CachePolicy>,
    ) -> Self {
        self.methods.push(MethodDescriptor {
            interface: self.name.clone(),
            name: name.into(),
            params: params.iter().map(ToString::to_string).collect(),
            cache,
        });
        self
    }

    /// Finish building.
    pub fn build(self) -> InterfaceDescriptor {
        InterfaceDescriptor {
            name: self.name,
            methods: self.methods,
        }
    }
}

/// One call routed through a chain: the method plus its ordered arguments.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Method being invoked.
    pub method: MethodDescriptor,
    /// Arguments in declaration order.
    pub args: Vec<Value>,
}

impl Invocation {
    /// Create an invocation for `method` with the given arguments.
    pub fn new(method: MethodDescriptor, args: Vec<Value>) -> Self {
        Self { method, args }
    }

    /// Argument at `position`, `Null` when absent.
    pub fn arg(&self, position: usize) -> &Value {
        self.args.get(position).unwrap_or(&Value::Null)
    }
}

/// Extract an integer argument, faulting with a descriptive error otherwise.
pub fn int_arg(method: &str, args: &[Value], position: usize) -> Result<i64, CallError> {
    args.get(position)
        .and_then(Value::as_i64)
        .ok_or(CallError::ArgumentMismatch {
            method: method.to_string(),
            position,
            expected: "integer",
        })
}
