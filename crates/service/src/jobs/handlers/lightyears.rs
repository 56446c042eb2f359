//! Lightyear distance resolution via the black calculator

use async_trait::async_trait;
use haul_adapters::{FrogApi, FrogCalculator};
use haul_types::constants::limits::LIGHTYEAR_PROBE_COLLATERAL;
use haul_types::{CacheStore, CacheStoreExt, DistanceRecord};
use std::sync::Arc;
use tracing::info;

use crate::jobs::generic_handler::{GenericJobHandler, RouteEndpoints};
use crate::jobs::types::{JobError, JobResult};

pub struct LightyearsDistanceHandler {
	store: Arc<dyn CacheStore>,
	frog: Arc<dyn FrogApi>,
}

impl LightyearsDistanceHandler {
	pub fn new(store: Arc<dyn CacheStore>, frog: Arc<dyn FrogApi>) -> Self {
		Self { store, frog }
	}
}

#[async_trait]
impl GenericJobHandler<RouteEndpoints> for LightyearsDistanceHandler {
	async fn handle(&self, params: RouteEndpoints) -> JobResult<()> {
		// The black calculator prices by distance only; the collateral is nominal
		let quote = self
			.frog
			.quote(
				FrogCalculator::Black,
				&params.origin,
				&params.destination,
				Some(LIGHTYEAR_PROBE_COLLATERAL),
			)
			.await
			.map_err(|e| JobError::Adapter(e.to_string()))?;

		let distance = quote.distance.ok_or_else(|| JobError::ProcessingFailed {
			message: format!(
				"No distance reported for {} -> {}",
				params.origin, params.destination
			),
		})?;

		let record = DistanceRecord::lightyears(&params.origin, &params.destination, distance);
		info!(
			"Resolved {} -> {} at {} ly",
			params.origin, params.destination, distance
		);

		self.store
			.set_json(&record.cache_key(), &record, None)
			.await
			.map_err(|e| JobError::Storage(e.to_string()))
	}
}
