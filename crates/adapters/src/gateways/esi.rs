//! EVE Swagger Interface client for universe topology

use async_trait::async_trait;
use haul_types::AdapterResult;
use serde::Deserialize;
use tracing::debug;

use super::{base, decode_response, EsiSystem, NamedId, TopologyApi};
use crate::client_cache::{ClientCache, ClientConfig};

#[derive(Debug, Deserialize)]
struct IdsResponse {
	#[serde(default)]
	systems: Vec<NamedId>,
}

#[derive(Debug, Clone)]
pub struct EsiClient {
	client_config: ClientConfig,
	cache: ClientCache,
}

impl EsiClient {
	pub fn new(base_url: &str, timeout_ms: Option<u64>, cache: ClientCache) -> Self {
		Self {
			client_config: ClientConfig::for_upstream(base_url, timeout_ms),
			cache,
		}
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", base(&self.client_config.base_url), path)
	}
}

#[async_trait]
impl TopologyApi for EsiClient {
	async fn resolve_system_ids(&self, names: &[String]) -> AdapterResult<Vec<NamedId>> {
		let client = self.cache.get_client(&self.client_config)?;
		let response = client
			.post(self.url("/universe/ids/"))
			.json(names)
			.send()
			.await?;
		let ids: IdsResponse = decode_response(response).await?;
		debug!("Resolved {} of {} system names", ids.systems.len(), names.len());
		Ok(ids.systems)
	}

	async fn route(&self, origin_id: i64, destination_id: i64) -> AdapterResult<Vec<i64>> {
		let client = self.cache.get_client(&self.client_config)?;
		let response = client
			.get(self.url(&format!("/route/{}/{}/", origin_id, destination_id)))
			.send()
			.await?;
		decode_response(response).await
	}

	async fn system(&self, system_id: i64) -> AdapterResult<EsiSystem> {
		let client = self.cache.get_client(&self.client_config)?;
		let response = client
			.get(self.url(&format!("/universe/systems/{}/", system_id)))
			.send()
			.await?;
		decode_response(response).await
	}
}
