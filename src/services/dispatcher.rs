//! Method-table dispatch for base implementations.
//!
//! An implementation registers one handler per interface method. Dispatch
//! looks the handler up by the invocation's method name; a fault returned by
//! the handler is wrapped in exactly one [`CallError::Dispatch`] layer, the
//! analogue of an invocation-wrapper exception, which the logging behavior
//! unwraps before re-raising.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::errors::{CallError, CallResult};
use crate::domain::models::invocation::{InterfaceDescriptor, Invocation};
use crate::domain::ports::Callable;

type MethodHandler = Box<dyn Fn(&[Value]) -> Result<Value, CallError> + Send + Sync>;

/// Routes invocations to per-method handlers of one implementation.
pub struct Dispatcher {
    interface: Arc<InterfaceDescriptor>,
    handlers: HashMap<String, MethodHandler>,
}

impl Dispatcher {
    /// Create an empty dispatcher for `interface`.
    pub fn new(interface: Arc<InterfaceDescriptor>) -> Self {
        Self {
            interface,
            handlers: HashMap::new(),
        }
    }

    /// Register the handler for `method`.
    pub fn handle(
        mut self,
        method: impl Into<String>,
        handler: impl Fn(&[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
    ) -> Self {
        self.handlers.insert(method.into(), Box::new(handler));
        self
    }

    /// The interface this dispatcher implements.
    pub fn interface(&self) -> &InterfaceDescriptor {
        &self.interface
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("interface", &self.interface.name)
            .field("methods", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Callable for Dispatcher {
    fn call(&self, invocation: &Invocation) -> CallResult {
        let handler =
            self.handlers
                .get(&invocation.method.name)
                .ok_or_else(|| CallError::UnknownMethod {
                    interface: self.interface.name.clone(),
                    method: invocation.method.name.clone(),
                })?;

        handler(&invocation.args).map_err(|source| CallError::Dispatch {
            source: Box::new(source),
        })
    }
}
