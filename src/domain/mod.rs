//! Domain layer: models, errors, and the trait seams of the engine.

pub mod capability;
pub mod errors;
pub mod models;
pub mod ports;
