use std::sync::Arc;

use haul_service::{AggregatorTrait, MainlandTrait, SystemsCatalog};
use haul_types::CacheStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
	pub aggregator: Arc<dyn AggregatorTrait>,
	pub mainland: Arc<dyn MainlandTrait>,
	pub systems: Arc<SystemsCatalog>,
	pub store: Arc<dyn CacheStore>,
}
