//! Provider registry and the standard provider set

use haul_types::{
	CacheStore, DistanceJobSink, ProviderId, QuoteProvider, TtlWindow,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::gateways::{FrogApi, FrogCalculator, PushxApi};
use crate::haulers_channel::HaulersChannelProvider;
use crate::provider::{CachePolicy, CachedProvider, ProviderConfig};
use crate::rate_limiter::RateLimiter;
use crate::strategies::{FrogSource, GhsolSource, PushxSource};
use crate::topology::SystemDirectory;

/// Caps and cache lifetimes of one upstream-backed provider
pub fn provider_config(id: ProviderId) -> Option<ProviderConfig> {
	let window = |success: TtlWindow| ProviderConfig {
		id,
		max_volume: 0.0,
		max_collateral: 0.0,
		success_cache: CachePolicy::Window(success),
		rejection_cache: CachePolicy::Window(TtlWindow::rejection()),
	};

	let config = match id {
		ProviderId::RedFrog => ProviderConfig {
			max_volume: 845_000.0,
			max_collateral: 1_500_000_000.0,
			..window(TtlWindow::week())
		},
		ProviderId::PurpleFrog => ProviderConfig {
			max_volume: 62_500.0,
			max_collateral: 10_000_000_000.0,
			..window(TtlWindow::week())
		},
		ProviderId::BlackFrog => ProviderConfig {
			max_volume: 320_000.0,
			max_collateral: 25_000_000_000.0,
			..window(TtlWindow::week())
		},
		ProviderId::PushX => ProviderConfig {
			max_volume: 1_126_500.0,
			max_collateral: 50_000_000_000.0,
			..window(TtlWindow::half_day())
		},
		// Flat tables never change, so neither do their answers
		ProviderId::Ghsol => ProviderConfig {
			id,
			max_volume: 360_000.0,
			max_collateral: 7_000_000_000.0,
			success_cache: CachePolicy::Forever,
			rejection_cache: CachePolicy::Forever,
		},
		ProviderId::HaulersChannel => return None,
	};
	Some(config)
}

/// PushX admission limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
	pub limit: usize,
	pub window: Duration,
}

/// Everything the standard provider set is built from
#[derive(Clone)]
pub struct ProviderDeps {
	pub store: Arc<dyn CacheStore>,
	pub frog: Arc<dyn FrogApi>,
	pub pushx: Arc<dyn PushxApi>,
	pub directory: SystemDirectory,
	pub distance_jobs: Arc<dyn DistanceJobSink>,
	pub pushx_rate_limit: RateLimitSettings,
}

/// Lookup of provider adapters by id
#[derive(Default, Clone)]
pub struct ProviderRegistry {
	providers: HashMap<ProviderId, Arc<dyn QuoteProvider>>,
}

impl ProviderRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// All six providers wired against the given gateways
	pub fn standard(deps: ProviderDeps) -> Self {
		let mut registry = Self::new();
		let store = deps.store.clone();

		for (id, calculator) in [
			(ProviderId::RedFrog, FrogCalculator::Red),
			(ProviderId::PurpleFrog, FrogCalculator::Purple),
			(ProviderId::BlackFrog, FrogCalculator::Black),
		] {
			if let Some(config) = provider_config(id) {
				let source = FrogSource::new(deps.frog.clone(), calculator);
				registry.register(Arc::new(CachedProvider::new(config, source, store.clone())));
			}
		}

		if let Some(config) = provider_config(ProviderId::PushX) {
			let limiter = RateLimiter::new(
				store.clone(),
				ProviderId::PushX.cache_name(),
				deps.pushx_rate_limit.limit,
				deps.pushx_rate_limit.window,
			);
			let provider = CachedProvider::new(config, PushxSource::new(deps.pushx.clone()), store.clone())
				.with_rate_limiter(limiter);
			registry.register(Arc::new(provider));
		}

		if let Some(config) = provider_config(ProviderId::Ghsol) {
			let source = GhsolSource::new(deps.directory.clone());
			registry.register(Arc::new(CachedProvider::new(config, source, store.clone())));
		}

		registry.register(Arc::new(HaulersChannelProvider::new(
			store,
			deps.distance_jobs.clone(),
		)));

		registry
	}

	pub fn register(&mut self, provider: Arc<dyn QuoteProvider>) {
		self.providers.insert(provider.id(), provider);
	}

	pub fn get(&self, id: ProviderId) -> Option<Arc<dyn QuoteProvider>> {
		self.providers.get(&id).cloned()
	}

	/// Registered provider ids in a stable order
	pub fn ids(&self) -> Vec<ProviderId> {
		let mut ids: Vec<ProviderId> = self.providers.keys().copied().collect();
		ids.sort();
		ids
	}

	pub fn len(&self) -> usize {
		self.providers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.providers.is_empty()
	}
}
