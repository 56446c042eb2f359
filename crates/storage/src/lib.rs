//! Haul Storage
//!
//! Cache store backends for the hauling quote aggregator.
//! Supports an in-process memory store and, behind the `redis` feature, Redis.

pub mod memory_store;

#[cfg(feature = "redis")]
pub mod redis_store;

pub use haul_types::storage::{CacheStore, CacheStoreExt, StorageError, StorageResult};
pub use memory_store::MemoryStore;

#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
