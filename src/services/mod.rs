//! Composition engine: dispatch, wrapping, and chain building.

pub mod capability_map;
pub mod chain_builder;
pub mod dispatcher;
pub mod interception;
pub mod registry;

pub use capability_map::CapabilityMap;
pub use chain_builder::ChainBuilder;
pub use dispatcher::Dispatcher;
pub use registry::ServiceRegistry;
