//! Distance lookup and deduplicated job enqueueing

use async_trait::async_trait;
use haul_types::cache_keys::distance_prefix;
use haul_types::{
	CacheStore, DistanceJob, DistanceJobSink, DistanceLookup, DistanceMetric, DistanceRecord,
	Distances, EnqueueError, StorageResult,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::jobs::{BackgroundJob, JobError, JobProcessor, RetryPolicy};

/// Read every stored distance record for an origin/destination pair
pub async fn lookup_distances(
	store: &dyn CacheStore,
	origin: &str,
	destination: &str,
) -> StorageResult<DistanceLookup> {
	let entries = store
		.scan_prefix(&distance_prefix(origin, destination), DistanceMetric::ALL.len())
		.await?;

	let records = entries.into_iter().filter_map(|(key, value)| {
		match serde_json::from_value::<DistanceRecord>(value) {
			Ok(record) => Some(record),
			Err(e) => {
				warn!("Ignoring malformed distance record at {}: {}", key, e);
				None
			},
		}
	});

	let distances = Distances::from_records(records);
	if distances.is_empty() {
		Ok(DistanceLookup::Missing)
	} else {
		Ok(DistanceLookup::Found(distances))
	}
}

/// Enqueue-if-absent front of the background distance jobs
///
/// A job record with a short TTL is written to the cache before the job is
/// handed to the processor, so only the first request for a pair within
/// that window triggers work, across processes sharing the cache.
pub struct DistanceService {
	store: Arc<dyn CacheStore>,
	processor: Arc<JobProcessor>,
	job_record_ttl: Duration,
	retry_policy: Option<RetryPolicy>,
}

impl DistanceService {
	pub fn new(
		store: Arc<dyn CacheStore>,
		processor: Arc<JobProcessor>,
		job_record_ttl: Duration,
		retry_policy: Option<RetryPolicy>,
	) -> Self {
		Self {
			store,
			processor,
			job_record_ttl,
			retry_policy,
		}
	}

	pub fn processor(&self) -> &Arc<JobProcessor> {
		&self.processor
	}
}

#[async_trait]
impl DistanceJobSink for DistanceService {
	async fn enqueue(&self, job: DistanceJob) -> Result<bool, EnqueueError> {
		let key = job.key();
		let record = serde_json::to_value(&job).map_err(haul_types::StorageError::from)?;

		if !self
			.store
			.set_if_absent(&key, record, Some(self.job_record_ttl))
			.await?
		{
			debug!("Distance job {} already recorded", key);
			return Ok(false);
		}

		let background = BackgroundJob::ResolveDistance(job);
		match self
			.processor
			.submit(background, Some(key.clone()), self.retry_policy.clone())
			.await
		{
			Ok(()) => Ok(true),
			Err(JobError::Duplicate { .. }) => Ok(false),
			Err(e) => {
				// Free the record so a later request can try again
				if let Err(cleanup) = self.store.delete(&key).await {
					warn!("Failed to release job record {}: {}", key, cleanup);
				}
				Err(EnqueueError::QueueUnavailable {
					message: e.to_string(),
				})
			},
		}
	}
}
