//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;

use entwine::domain::models::invocation::{int_arg, CachePolicy};
use entwine::{
    CacheStore, CachingBehaviorFactory, CapabilityMap, Dispatcher, InterfaceDescriptor,
    Invocation, LoggingBehaviorFactory, MemoryCacheStore, ServiceDescriptor, ServiceRegistry,
    TraceLevel, TraceSink,
};

pub const DEMO_INTERFACE: &str = "demo.Demo";
pub const DEMO_IMPLEMENTATION: &str = "demo.DemoManager";

/// Trace sink recording every line for ordering assertions.
#[derive(Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<(TraceLevel, String)>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<(TraceLevel, String)> {
        self.lines.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lines().into_iter().map(|(_, m)| m).collect()
    }
}

impl TraceSink for RecordingSink {
    fn emit(&self, level: TraceLevel, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_string()));
    }
}

/// Demo interface: `run(value, more)` with the given policy, plus an
/// uncached `plain(value)`.
pub fn demo_interface(run_policy: Option<CachePolicy>) -> InterfaceDescriptor {
    let builder = InterfaceDescriptor::builder(DEMO_INTERFACE);
    let builder = match run_policy {
        Some(policy) => builder.cached_method("run", &["value", "more"], policy),
        None => builder.method("run", &["value", "more"]),
    };
    builder.method("plain", &["value"]).build()
}

/// Registry with the demo implementation (`run` computes `15 * value`,
/// `plain` computes `value + 1`, both counting invocations) and both stock
/// behaviors.
pub fn demo_registry(
    interface: InterfaceDescriptor,
    target_calls: Arc<AtomicUsize>,
) -> ServiceRegistry {
    let mut registry = ServiceRegistry::new();
    registry.register_interface(interface.clone());

    let dispatch_interface = Arc::new(interface);
    registry.register_implementation(
        DEMO_IMPLEMENTATION,
        DEMO_INTERFACE,
        vec![],
        move |_dependencies| {
            let run_calls = target_calls.clone();
            let plain_calls = target_calls.clone();
            let dispatcher = Dispatcher::new(dispatch_interface.clone())
                .handle("run", move |args| {
                    run_calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!(15 * int_arg("run", args, 0)?))
                })
                .handle("plain", move |args| {
                    plain_calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!(int_arg("plain", args, 0)? + 1))
                });
            Ok(Arc::new(dispatcher))
        },
    );
    registry.register_behavior(CachingBehaviorFactory);
    registry.register_behavior(LoggingBehaviorFactory);
    registry
}

/// Capability map with a fresh cache store and, optionally, a trace sink.
pub fn demo_resolver(sink: Option<Arc<dyn TraceSink>>) -> CapabilityMap {
    let mut resolver = CapabilityMap::new();
    resolver.provide::<Arc<dyn CacheStore>>(Arc::new(MemoryCacheStore::new()));
    if let Some(sink) = sink {
        resolver.provide::<Arc<dyn TraceSink>>(sink);
    }
    resolver
}

/// Descriptor for the demo service with the given behavior identifiers.
pub fn demo_descriptor(behaviors: &[&str]) -> ServiceDescriptor {
    ServiceDescriptor {
        interface: DEMO_INTERFACE.to_string(),
        implementation: DEMO_IMPLEMENTATION.to_string(),
        interception_behaviors: behaviors.iter().map(ToString::to_string).collect(),
    }
}

/// Invocation of a demo method with the given arguments.
pub fn invoke(
    interface: &InterfaceDescriptor,
    method: &str,
    args: Vec<serde_json::Value>,
) -> Invocation {
    Invocation::new(interface.method(method).expect("known method").clone(), args)
}
