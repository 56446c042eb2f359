//! Haulers Channel: locally priced from resolved gate distances

use async_trait::async_trait;
use haul_types::cache_keys::distance_key;
use haul_types::{
	CacheStore, CacheStoreExt, DistanceJob, DistanceJobSink, DistanceMetric, DistanceRecord,
	ErrorKind, ProviderDetails, ProviderId, QuoteFailure, QuoteOffer, QuoteProvider, QuoteResult,
	RouteParameters,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::pricing::{haulers_channel_reward, PricingInput};

/// Contracts stay open for a week
const DAYS_EXPIRATION: u32 = 7;
const STANDARD_DAYS: u32 = 3;
const RUSH_DAYS: u32 = 1;

pub struct HaulersChannelProvider {
	store: Arc<dyn CacheStore>,
	jobs: Arc<dyn DistanceJobSink>,
}

impl fmt::Debug for HaulersChannelProvider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HaulersChannelProvider").finish_non_exhaustive()
	}
}

impl HaulersChannelProvider {
	pub fn new(store: Arc<dyn CacheStore>, jobs: Arc<dyn DistanceJobSink>) -> Self {
		Self { store, jobs }
	}

	async fn gate_distance(&self, params: &RouteParameters) -> Option<DistanceRecord> {
		let key = distance_key(&params.origin, &params.destination, DistanceMetric::Gates);
		match self.store.get_json::<DistanceRecord>(&key).await {
			Ok(Some(record))
				if record.jump_count.is_some() && record.per_system_security.is_some() =>
			{
				Some(record)
			},
			Ok(_) => None,
			Err(e) => {
				warn!("Failed to read {}: {}", key, e);
				None
			},
		}
	}

	fn price(
		details: &ProviderDetails,
		input: PricingInput,
		days_to_complete: u32,
	) -> QuoteResult {
		match haulers_channel_reward(input) {
			Ok(reward) => {
				let offer = QuoteOffer::new(details, reward, days_to_complete, DAYS_EXPIRATION);
				if input.rush {
					offer.with_rush_hours(24).into()
				} else {
					offer.into()
				}
			},
			Err(rejection) => {
				QuoteFailure::with_message(details, ErrorKind::PricingRejected, rejection.to_string())
					.into()
			},
		}
	}
}

#[async_trait]
impl QuoteProvider for HaulersChannelProvider {
	fn id(&self) -> ProviderId {
		ProviderId::HaulersChannel
	}

	async fn quote(&self, params: &RouteParameters) -> Vec<QuoteResult> {
		let Some(record) = self.gate_distance(params).await else {
			let job = DistanceJob::new(&params.origin, &params.destination, DistanceMetric::Gates);
			match self.jobs.enqueue(job).await {
				Ok(submitted) => debug!(submitted, "Gate distance missing, job requested"),
				Err(e) => warn!("Failed to enqueue gate distance job: {}", e),
			}
			return Vec::new();
		};

		let details = self.details();
		let jumps = record.jump_count.unwrap_or_default().max(1) as f64;
		let input = PricingInput {
			volume: params.volume,
			jumps,
			collateral: params.collateral,
			rush: true,
			highsec_only: record.is_highsec_only(),
		};

		vec![
			Self::price(&details, input, RUSH_DAYS),
			Self::price(
				&details,
				PricingInput {
					rush: false,
					..input
				},
				STANDARD_DAYS,
			),
		]
	}
}
