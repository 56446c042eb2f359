//! Core aggregation service logic

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use haul_adapters::ProviderRegistry;
use haul_types::cache_keys::results_key;
use haul_types::{
	CacheStore, CacheStoreExt, DistanceJob, DistanceJobSink, DistanceLookup, DistanceMetric,
	Distances, ErrorKind, ProviderId, QuoteFailure, QuoteResult, RouteParameters, RouteResponse,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::distance::lookup_distances;

/// Route quoting as seen by the HTTP layer
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait AggregatorTrait: Send + Sync {
	/// Fan the request out to the selected providers and merge their answers
	async fn fetch_route(&self, params: RouteParameters) -> RouteResponse;
}

/// Tunables of the aggregation service
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
	/// Providers used when the request does not name any
	pub default_providers: Vec<ProviderId>,
	/// Lifetime of stored response history
	pub history_ttl: Duration,
}

impl Default for AggregatorConfig {
	fn default() -> Self {
		Self {
			default_providers: ProviderId::DEFAULTS.to_vec(),
			history_ttl: Duration::from_secs(
				haul_types::constants::limits::DEFAULT_HISTORY_TTL_SECONDS,
			),
		}
	}
}

/// Service for aggregating quotes from multiple providers
pub struct AggregatorService {
	registry: Arc<ProviderRegistry>,
	store: Arc<dyn CacheStore>,
	distance_jobs: Arc<dyn DistanceJobSink>,
	config: AggregatorConfig,
}

impl AggregatorService {
	pub fn new(
		registry: Arc<ProviderRegistry>,
		store: Arc<dyn CacheStore>,
		distance_jobs: Arc<dyn DistanceJobSink>,
		config: AggregatorConfig,
	) -> Self {
		Self {
			registry,
			store,
			distance_jobs,
			config,
		}
	}

	/// Query every selected provider concurrently and flatten their entries
	///
	/// There is no overall deadline: the slowest provider bounds the call.
	async fn collect_quotes(&self, params: &RouteParameters) -> Vec<QuoteResult> {
		let selected = params.selected_providers(&self.config.default_providers);
		info!(
			"Fetching quotes for {} -> {} from {} providers",
			params.origin,
			params.destination,
			selected.len()
		);

		let tasks = selected.into_iter().filter_map(|id| {
			let Some(provider) = self.registry.get(id) else {
				warn!("No adapter registered for provider {}", id);
				return None;
			};
			let params = params.clone();
			Some(async move {
				let handle = tokio::spawn(async move { provider.quote(&params).await });
				match handle.await {
					Ok(results) => results,
					Err(e) => {
						warn!("Provider {} task failed: {}", id, e);
						vec![QuoteFailure::new(&id.details(), ErrorKind::RouteUnavailable).into()]
					},
				}
			})
		});

		let results: Vec<QuoteResult> = join_all(tasks).await.into_iter().flatten().collect();
		debug!("Collected {} provider entries", results.len());
		results
	}

	/// Attach whatever distances are known and enqueue the missing ones
	async fn resolve_distances(&self, params: &RouteParameters) -> Option<Distances> {
		let distances = match lookup_distances(
			self.store.as_ref(),
			&params.origin,
			&params.destination,
		)
		.await
		{
			Ok(DistanceLookup::Found(distances)) => Some(distances),
			Ok(DistanceLookup::Missing) => None,
			Err(e) => {
				warn!("Failed to read distances: {}", e);
				return None;
			},
		};

		let missing = DistanceMetric::ALL.into_iter().filter(|metric| {
			let known = distances.as_ref();
			match metric {
				DistanceMetric::Gates => known.and_then(|d| d.gates.as_ref()).is_none(),
				DistanceMetric::Lightyears => known.and_then(|d| d.lightyears.as_ref()).is_none(),
			}
		});

		for metric in missing {
			let job = DistanceJob::new(&params.origin, &params.destination, metric);
			if let Err(e) = self.distance_jobs.enqueue(job).await {
				warn!(
					"Failed to enqueue {} distance for {} -> {}: {}",
					metric, params.origin, params.destination, e
				);
			}
		}

		distances
	}

	/// Best-effort history write; never fails the request
	async fn persist_history(&self, response: &RouteResponse) {
		let key = results_key(Utc::now().timestamp_millis());
		if let Err(e) = self
			.store
			.set_json(&key, response, Some(self.config.history_ttl))
			.await
		{
			warn!("Failed to persist result: {}", e);
		}
	}
}

#[async_trait]
impl AggregatorTrait for AggregatorService {
	async fn fetch_route(&self, params: RouteParameters) -> RouteResponse {
		let results = self.collect_quotes(&params).await;
		let distances = self.resolve_distances(&params).await;

		let response = RouteResponse::new(results, distances);
		info!(
			"Route {} -> {} answered with {} entries",
			params.origin,
			params.destination,
			response.providers.len()
		);

		self.persist_history(&response).await;
		response
	}
}
