//! Cached view over the universe topology service

use futures::future::join_all;
use haul_types::cache_keys::system_info_key;
use haul_types::{AdapterError, AdapterResult, CacheStore, CacheStoreExt, SystemInfo};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::gateways::{EsiSystem, TopologyApi};

impl From<EsiSystem> for SystemInfo {
	fn from(system: EsiSystem) -> Self {
		SystemInfo {
			name: system.name,
			system_id: system.system_id,
			security_status: system.security_status,
			constellation_id: system.constellation_id,
		}
	}
}

/// Resolves system names, metadata and paths, caching metadata forever
#[derive(Clone)]
pub struct SystemDirectory {
	api: Arc<dyn TopologyApi>,
	store: Arc<dyn CacheStore>,
}

impl SystemDirectory {
	pub fn new(api: Arc<dyn TopologyApi>, store: Arc<dyn CacheStore>) -> Self {
		Self { api, store }
	}

	/// Metadata for one system, from cache when known
	pub async fn system_info(&self, system_id: i64) -> AdapterResult<SystemInfo> {
		let key = system_info_key(system_id);
		match self.store.get_json::<SystemInfo>(&key).await {
			Ok(Some(info)) => return Ok(info),
			Ok(None) => {},
			Err(e) => warn!("Failed to read {} from cache: {}", key, e),
		}

		let info: SystemInfo = self.api.system(system_id).await?.into();
		if let Err(e) = self.store.set_json(&key, &info, None).await {
			warn!("Failed to cache {}: {}", key, e);
		}
		debug!("Resolved system {} ({})", info.name, system_id);
		Ok(info)
	}

	/// Ids for the given names in input order, failing on the first unknown name
	pub async fn resolve_ids(&self, names: &[String]) -> AdapterResult<Vec<i64>> {
		let resolved = self.api.resolve_system_ids(names).await?;
		names
			.iter()
			.map(|name| {
				resolved
					.iter()
					.find(|entry| entry.name.eq_ignore_ascii_case(name))
					.map(|entry| entry.id)
					.ok_or_else(|| AdapterError::UnknownSystem { name: name.clone() })
			})
			.collect()
	}

	/// Metadata for every named system, in input order
	pub async fn systems_by_name(&self, names: &[String]) -> AdapterResult<Vec<SystemInfo>> {
		let ids = self.resolve_ids(names).await?;
		join_all(ids.into_iter().map(|id| self.system_info(id)))
			.await
			.into_iter()
			.collect()
	}

	/// Security status of every system on the shortest path, in path order
	pub async fn path_security(&self, origin: &str, destination: &str) -> AdapterResult<Vec<f64>> {
		let ids = self
			.resolve_ids(&[origin.to_string(), destination.to_string()])
			.await?;
		let path = self.api.route(ids[0], ids[1]).await?;

		let infos = join_all(path.iter().map(|id| self.system_info(*id))).await;
		infos
			.into_iter()
			.map(|info| info.map(|info| info.security_status))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::gateways::{MockTopologyApi, NamedId};
	use haul_storage::MemoryStore;

	fn esi_system(id: i64, name: &str, security: f64) -> EsiSystem {
		EsiSystem {
			system_id: id,
			name: name.to_string(),
			security_status: security,
			constellation_id: Some(20000020),
		}
	}

	#[tokio::test]
	async fn test_system_info_is_cached() {
		let mut api = MockTopologyApi::new();
		api.expect_system()
			.times(1)
			.returning(|id| Ok(esi_system(id, "Jita", 0.946)));

		let store = Arc::new(MemoryStore::new());
		let directory = SystemDirectory::new(Arc::new(api), store.clone());

		let first = directory.system_info(30000142).await.unwrap();
		let second = directory.system_info(30000142).await.unwrap();
		assert_eq!(first, second);
		assert!(store.get("systemInfo:30000142").await.unwrap().is_some());
	}

	#[tokio::test]
	async fn test_resolve_ids_keeps_input_order() {
		let mut api = MockTopologyApi::new();
		api.expect_resolve_system_ids().returning(|_| {
			Ok(vec![
				NamedId {
					id: 2,
					name: "Amarr".to_string(),
				},
				NamedId {
					id: 1,
					name: "Jita".to_string(),
				},
			])
		});
		let directory = SystemDirectory::new(Arc::new(api), Arc::new(MemoryStore::new()));

		let ids = directory
			.resolve_ids(&["jita".to_string(), "Amarr".to_string()])
			.await
			.unwrap();
		assert_eq!(ids, vec![1, 2]);

		let err = directory
			.resolve_ids(&["Nowhere".to_string()])
			.await
			.unwrap_err();
		assert!(matches!(err, AdapterError::UnknownSystem { .. }));
	}

	#[tokio::test]
	async fn test_path_security_follows_path_order() {
		let mut api = MockTopologyApi::new();
		api.expect_resolve_system_ids().returning(|_| {
			Ok(vec![
				NamedId {
					id: 1,
					name: "Jita".to_string(),
				},
				NamedId {
					id: 3,
					name: "Amarr".to_string(),
				},
			])
		});
		api.expect_route().returning(|_, _| Ok(vec![1, 2, 3]));
		api.expect_system().returning(|id| {
			let security = match id {
				1 => 0.9,
				2 => 0.4,
				_ => 1.0,
			};
			Ok(esi_system(id, "System", security))
		});
		let directory = SystemDirectory::new(Arc::new(api), Arc::new(MemoryStore::new()));

		let path = directory.path_security("Jita", "Amarr").await.unwrap();
		assert_eq!(path, vec![0.9, 0.4, 1.0]);
	}
}
