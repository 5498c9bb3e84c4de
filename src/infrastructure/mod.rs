//! Infrastructure layer: configuration, cache storage, trace sinks.

pub mod cache;
pub mod config;
pub mod trace;
