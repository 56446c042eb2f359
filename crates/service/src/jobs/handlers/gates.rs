//! Gate route resolution

use async_trait::async_trait;
use haul_adapters::SystemDirectory;
use haul_types::{CacheStore, CacheStoreExt, DistanceRecord};
use std::sync::Arc;
use tracing::info;

use crate::jobs::generic_handler::{GenericJobHandler, RouteEndpoints};
use crate::jobs::types::{JobError, JobResult};

/// Resolves the shortest gate path and stores its per-hop security
pub struct GatesDistanceHandler {
	store: Arc<dyn CacheStore>,
	directory: SystemDirectory,
}

impl GatesDistanceHandler {
	pub fn new(store: Arc<dyn CacheStore>, directory: SystemDirectory) -> Self {
		Self { store, directory }
	}
}

#[async_trait]
impl GenericJobHandler<RouteEndpoints> for GatesDistanceHandler {
	async fn handle(&self, params: RouteEndpoints) -> JobResult<()> {
		let security = self
			.directory
			.path_security(&params.origin, &params.destination)
			.await
			.map_err(|e| JobError::Adapter(e.to_string()))?;

		let record = DistanceRecord::gates(&params.origin, &params.destination, security);
		info!(
			"Resolved {} -> {} in {:?} jumps",
			params.origin, params.destination, record.jump_count
		);

		// Overwrite rather than merge so repeated runs converge
		self.store
			.set_json(&record.cache_key(), &record, None)
			.await
			.map_err(|e| JobError::Storage(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use haul_adapters::gateways::{EsiSystem, NamedId};
	use haul_adapters::MockTopologyApi;
	use haul_storage::MemoryStore;
	use haul_types::DistanceMetric;
	use haul_types::cache_keys::distance_key;

	fn topology() -> MockTopologyApi {
		let mut api = MockTopologyApi::new();
		api.expect_resolve_system_ids().returning(|_| {
			Ok(vec![
				NamedId {
					id: 30000142,
					name: "Jita".to_string(),
				},
				NamedId {
					id: 30002187,
					name: "Amarr".to_string(),
				},
			])
		});
		api.expect_route()
			.returning(|_, _| Ok(vec![30000142, 30000144, 30002187]));
		api.expect_system().returning(|id| {
			let security = match id {
				30000142 => 0.95,
				30000144 => 0.4,
				_ => 1.0,
			};
			Ok(EsiSystem {
				system_id: id,
				name: format!("system-{}", id),
				security_status: security,
				constellation_id: None,
			})
		});
		api
	}

	#[tokio::test]
	async fn test_gates_job_writes_record_in_path_order() {
		let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new());
		let directory = SystemDirectory::new(Arc::new(topology()), store.clone());
		let handler = GatesDistanceHandler::new(store.clone(), directory);

		handler
			.handle(RouteEndpoints::new("Jita", "Amarr"))
			.await
			.unwrap();

		let record: DistanceRecord = store
			.get_json(&distance_key("Jita", "Amarr", DistanceMetric::Gates))
			.await
			.unwrap()
			.unwrap();
		assert_eq!(record.jump_count, Some(2));
		assert_eq!(record.per_system_security, Some(vec![0.95, 0.4, 1.0]));
		assert!(!record.is_highsec_only());
	}

	#[tokio::test]
	async fn test_gates_job_is_idempotent() {
		let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new());
		let directory = SystemDirectory::new(Arc::new(topology()), store.clone());
		let handler = GatesDistanceHandler::new(store.clone(), directory);
		let key = distance_key("Jita", "Amarr", DistanceMetric::Gates);

		handler.handle(RouteEndpoints::new("Jita", "Amarr")).await.unwrap();
		let first = store.get(&key).await.unwrap();
		handler.handle(RouteEndpoints::new("Jita", "Amarr")).await.unwrap();
		let second = store.get(&key).await.unwrap();

		assert!(first.is_some());
		assert_eq!(first, second);
	}

	#[tokio::test]
	async fn test_gates_job_fails_on_unknown_system() {
		let mut api = MockTopologyApi::new();
		api.expect_resolve_system_ids().returning(|_| Ok(vec![]));
		let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new());
		let handler = GatesDistanceHandler::new(
			store.clone(),
			SystemDirectory::new(Arc::new(api), store.clone()),
		);

		let result = handler.handle(RouteEndpoints::new("Nowhere", "Amarr")).await;
		assert!(matches!(result, Err(JobError::Adapter(_))));
	}
}
