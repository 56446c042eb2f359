//! Generic cached provider adapter
//!
//! Every upstream-backed provider follows the same contract: enforce hard
//! caps, consult the route cache, fall through to the upstream (optionally
//! behind a rate limiter), normalize or classify, and remember what is worth
//! remembering. Only the [`QuoteSource`] strategy differs per provider.

use async_trait::async_trait;
use haul_types::{
	route_key, AdapterError, AdapterResult, CacheStore, CacheStoreExt, ErrorKind, ProviderDetails,
	ProviderId, QuoteFailure, QuoteProvider, QuoteResult, RouteParameters, TtlWindow,
};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::rate_limiter::{RateLimitError, RateLimiter};

/// How long a computed result stays in the route cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
	Never,
	Forever,
	Window(TtlWindow),
}

impl CachePolicy {
	/// `None` when the result must not be written, otherwise the TTL to write with
	fn ttl(&self) -> Option<Option<Duration>> {
		match self {
			CachePolicy::Never => None,
			CachePolicy::Forever => Some(None),
			CachePolicy::Window(window) => Some(Some(window.sample())),
		}
	}
}

/// Per-provider constants
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
	pub id: ProviderId,
	/// Exclusive upper bound on volume in m³
	pub max_volume: f64,
	/// Exclusive upper bound on collateral in ISK
	pub max_collateral: f64,
	pub success_cache: CachePolicy,
	/// Policy for stable rejections; other failures are never cached
	pub rejection_cache: CachePolicy,
}

/// Classified failure: kind plus the message shown to the user
pub type Classified = (ErrorKind, String);

/// Provider-specific upstream call, normalization and error classification
#[async_trait]
pub trait QuoteSource: Send + Sync + Debug {
	type Raw: Send;

	async fn fetch(&self, params: &RouteParameters) -> AdapterResult<Self::Raw>;

	fn normalize(
		&self,
		raw: Self::Raw,
		params: &RouteParameters,
		details: &ProviderDetails,
	) -> Vec<QuoteResult>;

	fn classify(&self, error: &AdapterError) -> Classified;
}

pub struct CachedProvider<S: QuoteSource> {
	config: ProviderConfig,
	source: S,
	store: Arc<dyn CacheStore>,
	rate_limiter: Option<RateLimiter>,
}

impl<S: QuoteSource> Debug for CachedProvider<S> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CachedProvider")
			.field("config", &self.config)
			.field("source", &self.source)
			.field("rate_limiter", &self.rate_limiter)
			.finish()
	}
}

impl<S: QuoteSource> CachedProvider<S> {
	pub fn new(config: ProviderConfig, source: S, store: Arc<dyn CacheStore>) -> Self {
		Self {
			config,
			source,
			store,
			rate_limiter: None,
		}
	}

	pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
		self.rate_limiter = Some(rate_limiter);
		self
	}

	fn check_limits(&self, params: &RouteParameters, details: &ProviderDetails) -> Option<QuoteResult> {
		let message = if params.volume > self.config.max_volume {
			"Too much volume."
		} else if params.collateral > self.config.max_collateral {
			"Too much collateral."
		} else {
			return None;
		};
		Some(QuoteFailure::with_message(details, ErrorKind::LimitExceeded, message).into())
	}

	async fn cached(&self, key: &str) -> Option<Vec<QuoteResult>> {
		match self.store.get_json::<Vec<QuoteResult>>(key).await {
			Ok(hit) => hit,
			Err(e) => {
				warn!("Failed to read cached route {}: {}", key, e);
				None
			},
		}
	}

	async fn admit(&self, details: &ProviderDetails) -> Result<(), QuoteResult> {
		let Some(limiter) = &self.rate_limiter else {
			return Ok(());
		};
		match limiter.try_acquire().await {
			Ok(()) => Ok(()),
			Err(RateLimitError::Exhausted { .. }) => {
				Err(QuoteFailure::new(details, ErrorKind::RateLimited).into())
			},
			Err(e) => {
				warn!(provider = %self.config.id, "Rate limiter unavailable: {}", e);
				Err(QuoteFailure::new(details, ErrorKind::RouteUnavailable).into())
			},
		}
	}

	/// Write results back when every entry is a success or a stable rejection
	async fn persist(&self, key: &str, results: &[QuoteResult]) {
		if results.is_empty() || !results.iter().all(QuoteResult::is_cacheable) {
			return;
		}

		let policy = if results.iter().all(QuoteResult::is_success) {
			self.config.success_cache
		} else {
			self.config.rejection_cache
		};
		let Some(ttl) = policy.ttl() else {
			return;
		};

		if let Err(e) = self.store.set_json(key, &results, ttl).await {
			warn!("Failed to cache route {}: {}", key, e);
		}
	}
}

#[async_trait]
impl<S: QuoteSource + 'static> QuoteProvider for CachedProvider<S> {
	fn id(&self) -> ProviderId {
		self.config.id
	}

	async fn quote(&self, params: &RouteParameters) -> Vec<QuoteResult> {
		let details = self.details();

		if let Some(rejection) = self.check_limits(params, &details) {
			return vec![rejection];
		}

		let key = route_key(self.config.id, params);
		if let Some(hit) = self.cached(&key).await {
			debug!(provider = %self.config.id, key = %key, "Route cache hit");
			return hit.into_iter().map(QuoteResult::mark_cached).collect();
		}

		if let Err(rejection) = self.admit(&details).await {
			return vec![rejection];
		}

		let results = match self.source.fetch(params).await {
			Ok(raw) => self.source.normalize(raw, params, &details),
			Err(error) => {
				let (kind, message) = self.source.classify(&error);
				if kind == ErrorKind::RouteUnavailable {
					warn!(provider = %self.config.id, "Upstream call failed: {}", error);
				} else {
					debug!(provider = %self.config.id, "Upstream rejected route: {}", error);
				}
				vec![QuoteFailure::with_message(&details, kind, message).into()]
			},
		};

		self.persist(&key, &results).await;
		results
	}
}
