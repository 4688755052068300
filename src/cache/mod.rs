// Cache module for local persistence.
// Stores fetched listings, recent changes, and UI flags with TTL-based validity.

pub mod paths;
pub mod service;
pub mod store;

pub use service::CacheService;
pub use store::{FileStore, KeyValueStore, MemoryStore};
