//! Red Frog public calculator client

use async_trait::async_trait;
use haul_types::AdapterResult;
use tracing::debug;

use super::{base, decode_response, FrogApi, FrogCalculator, FrogQuote};
use crate::client_cache::{ClientCache, ClientConfig};

#[derive(Debug, Clone)]
pub struct FrogClient {
	client_config: ClientConfig,
	cache: ClientCache,
}

impl FrogClient {
	pub fn new(base_url: &str, timeout_ms: Option<u64>, cache: ClientCache) -> Self {
		Self {
			client_config: ClientConfig::for_upstream(base_url, timeout_ms),
			cache,
		}
	}
}

#[async_trait]
impl FrogApi for FrogClient {
	async fn quote(
		&self,
		calculator: FrogCalculator,
		origin: &str,
		destination: &str,
		collateral: Option<f64>,
	) -> AdapterResult<FrogQuote> {
		let client = self.cache.get_client(&self.client_config)?;
		let url = format!(
			"{}/{}/",
			base(&self.client_config.base_url),
			calculator.path()
		);

		let mut query = vec![
			("origin", origin.to_string()),
			("destination", destination.to_string()),
		];
		if let Some(collateral) = collateral.filter(|_| calculator.takes_collateral()) {
			query.push(("collateral", collateral.to_string()));
		}

		debug!("Fetching {} calculator quote {} -> {}", calculator.path(), origin, destination);

		let response = client.get(&url).query(&query).send().await?;
		decode_response(response).await
	}
}
