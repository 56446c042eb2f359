//! PushX quote API client

use async_trait::async_trait;
use haul_types::AdapterResult;
use tracing::debug;

use super::{base, decode_response, PushxApi, PushxQuote};
use crate::client_cache::{ClientCache, ClientConfig};

#[derive(Debug, Clone)]
pub struct PushxClient {
	client_config: ClientConfig,
	api_client: String,
	cache: ClientCache,
}

impl PushxClient {
	pub fn new(
		base_url: &str,
		api_client: &str,
		timeout_ms: Option<u64>,
		cache: ClientCache,
	) -> Self {
		Self {
			client_config: ClientConfig::for_upstream(base_url, timeout_ms),
			api_client: api_client.to_string(),
			cache,
		}
	}
}

#[async_trait]
impl PushxApi for PushxClient {
	async fn quote(
		&self,
		origin: &str,
		destination: &str,
		volume: f64,
		collateral: f64,
	) -> AdapterResult<PushxQuote> {
		let client = self.cache.get_client(&self.client_config)?;
		let url = format!("{}/", base(&self.client_config.base_url));

		debug!("Fetching PushX quote {} -> {}", origin, destination);

		let response = client
			.get(&url)
			.query(&[
				("startSystemName", origin.to_string()),
				("endSystemName", destination.to_string()),
				("volume", volume.to_string()),
				("collateral", collateral.to_string()),
				("apiClient", self.api_client.clone()),
			])
			.send()
			.await?;
		decode_response(response).await
	}
}
