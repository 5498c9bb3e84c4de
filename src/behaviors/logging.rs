//! Call-logging behavior.
//!
//! Emits an entry trace, times the call, and emits a completion or error
//! trace. A dispatch-wrapper fault is unwrapped exactly one level so callers
//! see the implementation's original error, not the wrapper artifact.

use std::sync::Arc;
use std::time::Instant;

use crate::behaviors::emit;
use crate::domain::capability::{CapabilitySlot, DependencySet};
use crate::domain::errors::{CallError, CallResult, ChainResult};
use crate::domain::models::invocation::Invocation;
use crate::domain::ports::{BehaviorFactory, Callable, Interceptor, TraceLevel, TraceSink};
use crate::services::interception;

/// Behavior identifier used in service descriptors.
pub const LOGGING_BEHAVIOR_ID: &str = "Logging";

/// Interceptor tracing entry, exit, and elapsed time of every call.
///
/// Purely call-scoped; holds no state between calls.
#[derive(Default)]
pub struct LoggingBehavior {
    sink: Option<Arc<dyn TraceSink>>,
}

impl LoggingBehavior {
    /// Dependency-carrying construction path with an explicit sink.
    pub fn new(sink: Arc<dyn TraceSink>) -> Self {
        Self { sink: Some(sink) }
    }

    fn trace(&self, level: TraceLevel, message: &str) {
        emit(self.sink.as_ref(), level, message);
    }
}

impl Interceptor for LoggingBehavior {
    fn name(&self) -> &'static str {
        LOGGING_BEHAVIOR_ID
    }

    fn intercept(&self, invocation: &Invocation, target: &dyn Callable) -> CallResult {
        let method = invocation.method.qualified_name();
        let started = Instant::now();
        self.trace(TraceLevel::Info, &format!("[{}] entering {method}", self.name()));

        match target.call(invocation) {
            Ok(value) => {
                self.trace(
                    TraceLevel::Info,
                    &format!(
                        "[{}] finished {method} in {:?}",
                        self.name(),
                        started.elapsed()
                    ),
                );
                Ok(value)
            }
            Err(CallError::Dispatch { source }) => {
                // Re-raise the implementation's own fault, not the wrapper.
                self.trace(
                    TraceLevel::Error,
                    &format!("[{}] {method} failed: {source}", self.name()),
                );
                Err(*source)
            }
            Err(other) => Err(other),
        }
    }

    fn inject(&mut self, dependencies: &DependencySet) {
        if self.sink.is_none() {
            self.sink = dependencies.first_of::<Arc<dyn TraceSink>>();
        }
    }
}

/// Factory registered under [`LOGGING_BEHAVIOR_ID`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingBehaviorFactory;

impl BehaviorFactory for LoggingBehaviorFactory {
    fn id(&self) -> &'static str {
        LOGGING_BEHAVIOR_ID
    }

    fn slots(&self) -> Vec<CapabilitySlot> {
        vec![CapabilitySlot::optional::<Arc<dyn TraceSink>>("trace-sink")]
    }

    fn wrap(
        &self,
        original: Option<Arc<dyn Callable>>,
        dependencies: &DependencySet,
    ) -> ChainResult<Arc<dyn Callable>> {
        interception::wrap(LoggingBehavior::default(), original, dependencies)
    }
}
