//! Trace sink implementations.
//!
//! [`TracingSink`] forwards behavior traces into the `tracing` pipeline and
//! is the default when no sink is injected. [`ConsoleSink`] renders colored
//! lines for the demo console, one color per level.

use console::style;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{TraceLevel, TraceSink};

/// Sink forwarding to the `tracing` macros at the matching level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn emit(&self, level: TraceLevel, message: &str) {
        match level {
            TraceLevel::Debug => debug!("{message}"),
            TraceLevel::Info => info!("{message}"),
            TraceLevel::Warn => warn!("{message}"),
            TraceLevel::Error => error!("{message}"),
        }
    }
}

/// Sink printing colored lines to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl TraceSink for ConsoleSink {
    fn emit(&self, level: TraceLevel, message: &str) {
        let line = match level {
            TraceLevel::Debug => style(message).cyan(),
            TraceLevel::Info => style(message).green(),
            TraceLevel::Warn => style(message).yellow(),
            TraceLevel::Error => style(message).red(),
        };
        eprintln!("{line}");
    }
}
