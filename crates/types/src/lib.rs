//! Haul Types
//!
//! Shared models and traits for the hauling quote aggregator.
//! This crate contains all domain models organized by business entity.

pub mod adapters;
pub mod cache_keys;
pub mod constants;
pub mod distance;
pub mod providers;
pub mod quotes;
pub mod routes;
pub mod storage;

// Re-export chrono and serde_json for convenience
pub use chrono;
pub use serde_json;

pub use adapters::{AdapterError, AdapterResult, QuoteProvider};

pub use cache_keys::{collateral_bucket, route_key, volume_bucket, TtlWindow};

pub use distance::{
	DistanceJob, DistanceJobSink, DistanceLookup, DistanceMetric, DistanceRecord, Distances,
	EnqueueError, SystemInfo,
};

pub use providers::{ProviderDetails, ProviderId};

pub use quotes::{ErrorKind, QuoteFailure, QuoteOffer, QuoteResult, RouteResponse};

pub use routes::{RouteParameters, RouteQuery, ValidationError};

pub use storage::{CacheStore, CacheStoreExt, StorageError, StorageResult};

#[cfg(any(test, feature = "mocks"))]
pub use adapters::MockQuoteProvider;
#[cfg(any(test, feature = "mocks"))]
pub use distance::MockDistanceJobSink;
#[cfg(any(test, feature = "mocks"))]
pub use storage::MockCacheStore;
