//! Haul Adapters
//!
//! Upstream gateways and provider adapters for the hauling quote aggregator.

pub mod client_cache;
pub mod gateways;
pub mod haulers_channel;
pub mod pricing;
pub mod provider;
pub mod rate_limiter;
pub mod registry;
pub mod strategies;
pub mod topology;

pub use client_cache::{ClientCache, ClientConfig};
pub use gateways::{
	EsiClient, FrogApi, FrogCalculator, FrogClient, FrogQuote, PushxApi, PushxClient, TopologyApi,
	UpstreamEndpoints,
};
pub use haul_types::{AdapterError, AdapterResult, QuoteProvider};
pub use haulers_channel::HaulersChannelProvider;
pub use provider::{CachePolicy, CachedProvider, ProviderConfig, QuoteSource};
pub use rate_limiter::{RateLimitError, RateLimiter};
pub use registry::{provider_config, ProviderDeps, ProviderRegistry, RateLimitSettings};
pub use topology::SystemDirectory;

#[cfg(any(test, feature = "mocks"))]
pub use gateways::{MockFrogApi, MockPushxApi, MockTopologyApi};
