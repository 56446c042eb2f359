//! Outbound clients for the upstream pricing and topology services
//!
//! Each upstream sits behind a small trait so that provider adapters and
//! distance jobs can be exercised against mocks.

use async_trait::async_trait;
use haul_types::{AdapterError, AdapterResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub mod esi;
pub mod frog;
pub mod pushx;

pub use esi::EsiClient;
pub use frog::FrogClient;
pub use pushx::PushxClient;

/// Base URLs and client options for every upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamEndpoints {
	pub red_frog_base_url: String,
	pub pushx_base_url: String,
	pub esi_base_url: String,
	/// `apiClient` value identifying us to PushX
	pub pushx_api_client: String,
	pub request_timeout_ms: Option<u64>,
}

impl Default for UpstreamEndpoints {
	fn default() -> Self {
		Self {
			red_frog_base_url: "https://red-frog.org/api/public/v1/calculator".to_string(),
			pushx_base_url: "https://api.pushx.net/api/quote/json".to_string(),
			esi_base_url: "https://esi.evetech.net/latest".to_string(),
			pushx_api_client: "hauling-advisor".to_string(),
			request_timeout_ms: None,
		}
	}
}

/// One of the three public Red Frog calculators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrogCalculator {
	Red,
	Purple,
	Black,
}

impl FrogCalculator {
	pub fn path(&self) -> &'static str {
		match self {
			FrogCalculator::Red => "red",
			FrogCalculator::Purple => "purple",
			FrogCalculator::Black => "black",
		}
	}

	/// The red calculator prices by route only and takes no collateral
	pub fn takes_collateral(&self) -> bool {
		!matches!(self, FrogCalculator::Red)
	}
}

/// Calculator answer for one route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrogQuote {
	pub reward_base: f64,
	#[serde(default)]
	pub reward_rush: Option<f64>,
	pub days_to_complete: u32,
	pub days_expiration: u32,
	/// Jump distance in lightyears, reported by the black calculator
	#[serde(default)]
	pub distance: Option<f64>,
}

/// Raw PushX quote; failures arrive as a non-empty `PriceError`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PushxQuote {
	#[serde(default)]
	pub price_error: Option<String>,
	#[serde(default)]
	pub price_normal: Option<f64>,
	#[serde(default)]
	pub price_rush: Option<f64>,
	/// `"N (M)"`: standard days with rush days in parentheses
	#[serde(default)]
	pub days_to_accept: Option<String>,
	#[serde(default)]
	pub days_to_complete: Option<String>,
}

/// Name resolution entry from the topology service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedId {
	pub id: i64,
	pub name: String,
}

/// System metadata as served by the topology service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsiSystem {
	pub system_id: i64,
	pub name: String,
	pub security_status: f64,
	#[serde(default)]
	pub constellation_id: Option<i64>,
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait FrogApi: Send + Sync {
	async fn quote(
		&self,
		calculator: FrogCalculator,
		origin: &str,
		destination: &str,
		collateral: Option<f64>,
	) -> AdapterResult<FrogQuote>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait PushxApi: Send + Sync {
	async fn quote(
		&self,
		origin: &str,
		destination: &str,
		volume: f64,
		collateral: f64,
	) -> AdapterResult<PushxQuote>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait TopologyApi: Send + Sync {
	/// Resolve system names to ids; unknown names are simply absent
	async fn resolve_system_ids(&self, names: &[String]) -> AdapterResult<Vec<NamedId>>;

	/// Shortest stargate path, both endpoints included
	async fn route(&self, origin_id: i64, destination_id: i64) -> AdapterResult<Vec<i64>>;

	async fn system(&self, system_id: i64) -> AdapterResult<EsiSystem>;
}

#[derive(Deserialize)]
struct ErrorBody {
	error: String,
}

/// Decode a JSON body, turning non-2xx answers into upstream errors
///
/// Bodies of the form `{"error": "..."}` keep their text so adapters can
/// classify it.
pub(crate) async fn decode_response<T: DeserializeOwned>(
	response: reqwest::Response,
) -> AdapterResult<T> {
	let status = response.status();
	if !status.is_success() {
		let body = response.text().await.unwrap_or_default();
		return Err(match serde_json::from_str::<ErrorBody>(&body) {
			Ok(ErrorBody { error }) => AdapterError::Upstream { message: error },
			Err(_) => AdapterError::HttpStatusError {
				status_code: status.as_u16(),
				body,
			},
		});
	}

	response
		.json::<T>()
		.await
		.map_err(|e| AdapterError::invalid_response(format!("Failed to parse response: {}", e)))
}

/// Trim a trailing slash so paths can be appended uniformly
pub(crate) fn base(url: &str) -> &str {
	url.trim_end_matches('/')
}
