//! Haul Service
//!
//! Quote aggregation, distance resolution and the smaller lookups served
//! next to it.

pub mod aggregator;
pub mod distance;
pub mod jobs;
pub mod mainland;
pub mod systems;

pub use aggregator::{AggregatorConfig, AggregatorService, AggregatorTrait};
pub use distance::{lookup_distances, DistanceService};
pub use jobs::{
	BackgroundJob, BackgroundJobHandler, JobError, JobProcessor, JobProcessorConfig, RetryPolicy,
};
pub use mainland::{MainlandError, MainlandService, MainlandStatus, MainlandTrait};
pub use systems::{CatalogError, SystemsCatalog, SystemsResponse};

#[cfg(any(test, feature = "mocks"))]
pub use aggregator::MockAggregatorTrait;
#[cfg(any(test, feature = "mocks"))]
pub use mainland::MockMainlandTrait;
