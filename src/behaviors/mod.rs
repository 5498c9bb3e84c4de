//! Concrete interception behaviors.

pub mod caching;
pub mod logging;

pub use caching::{CachingBehavior, CachingBehaviorFactory};
pub use logging::{LoggingBehavior, LoggingBehaviorFactory};

use std::sync::Arc;

use crate::domain::ports::{TraceLevel, TraceSink};
use crate::infrastructure::trace::TracingSink;

/// Emit through the injected sink when one is set, otherwise fall back to
/// [`TracingSink`] so behaviors stay observable without any wiring.
pub(crate) fn emit(sink: Option<&Arc<dyn TraceSink>>, level: TraceLevel, message: &str) {
    match sink {
        Some(sink) => sink.emit(level, message),
        None => TracingSink.emit(level, message),
    }
}
