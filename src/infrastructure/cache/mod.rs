//! Cache storage backends.
//!
//! Uses `moka` for TTL-based concurrent caching with per-entry sliding
//! expiration and single-flight get-or-create.

pub mod memory;

pub use memory::MemoryCacheStore;
