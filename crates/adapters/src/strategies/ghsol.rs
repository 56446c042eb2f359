//! Galactic Hauling Solutions flat-rate tables
//!
//! No price call: the only upstream traffic is topology lookups for the two
//! endpoints, which decide whether the route is served at all.

use async_trait::async_trait;
use haul_types::{
	AdapterError, AdapterResult, ErrorKind, ProviderDetails, QuoteFailure, QuoteOffer,
	QuoteResult, RouteParameters, SystemInfo,
};

use super::classified;
use crate::provider::{Classified, QuoteSource};
use crate::topology::SystemDirectory;

const RELAY_REWARD: f64 = 210_000_000.0;
const RUSH_REWARD: f64 = 300_000_000.0;
/// Standard relay service is only offered up to this collateral
const RELAY_MAX_COLLATERAL: f64 = 4_000_000_000.0;

#[derive(Clone)]
pub struct GhsolSource {
	directory: SystemDirectory,
}

impl std::fmt::Debug for GhsolSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GhsolSource").finish_non_exhaustive()
	}
}

impl GhsolSource {
	pub fn new(directory: SystemDirectory) -> Self {
		Self { directory }
	}
}

#[async_trait]
impl QuoteSource for GhsolSource {
	type Raw = Vec<SystemInfo>;

	async fn fetch(&self, params: &RouteParameters) -> AdapterResult<Vec<SystemInfo>> {
		self.directory
			.systems_by_name(&[params.origin.clone(), params.destination.clone()])
			.await
	}

	fn normalize(
		&self,
		endpoints: Vec<SystemInfo>,
		params: &RouteParameters,
		details: &ProviderDetails,
	) -> Vec<QuoteResult> {
		if endpoints.iter().any(SystemInfo::is_nullsec) {
			return vec![QuoteFailure::new(details, ErrorKind::NullsecNotServed).into()];
		}

		let mut results = Vec::with_capacity(2);
		if params.collateral <= RELAY_MAX_COLLATERAL {
			results.push(QuoteOffer::new(details, RELAY_REWARD, 3, 3).into());
		}
		results.push(
			QuoteOffer::new(details, RUSH_REWARD, 1, 3)
				.with_rush_hours(24)
				.into(),
		);
		results
	}

	fn classify(&self, error: &AdapterError) -> Classified {
		match error {
			AdapterError::UnknownSystem { .. } => classified(ErrorKind::SystemNotFound),
			_ => classified(ErrorKind::RouteUnavailable),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::gateways::MockTopologyApi;
	use haul_storage::MemoryStore;
	use haul_types::ProviderId;
	use std::sync::Arc;

	fn source() -> GhsolSource {
		GhsolSource::new(SystemDirectory::new(
			Arc::new(MockTopologyApi::new()),
			Arc::new(MemoryStore::new()),
		))
	}

	fn system(name: &str, security: f64) -> SystemInfo {
		SystemInfo {
			name: name.to_string(),
			system_id: 1,
			security_status: security,
			constellation_id: None,
		}
	}

	fn params(collateral: f64) -> RouteParameters {
		RouteParameters {
			origin: "Jita".to_string(),
			destination: "Tama".to_string(),
			volume: 100_000.0,
			collateral,
			providers: None,
		}
	}

	#[test]
	fn test_nullsec_endpoint_refused() {
		let results = source().normalize(
			vec![system("Jita", 0.9), system("HED-GP", -0.2)],
			&params(1e9),
			&ProviderId::Ghsol.details(),
		);
		assert_eq!(results.len(), 1);
		assert_eq!(results[0].error_kind(), Some(ErrorKind::NullsecNotServed));
		assert!(results[0].is_cacheable());
	}

	#[test]
	fn test_relay_gated_by_collateral() {
		let details = ProviderId::Ghsol.details();
		let endpoints = vec![system("Jita", 0.9), system("Tama", 0.3)];

		let both = source().normalize(endpoints.clone(), &params(4_000_000_000.0), &details);
		assert_eq!(both.len(), 2);
		let rewards: Vec<f64> = both
			.iter()
			.filter_map(|r| match r {
				QuoteResult::Success(o) => Some(o.reward),
				_ => None,
			})
			.collect();
		assert_eq!(rewards, vec![210_000_000.0, 300_000_000.0]);

		let rush_only = source().normalize(endpoints, &params(4_000_000_001.0), &details);
		assert_eq!(rush_only.len(), 1);
		match &rush_only[0] {
			QuoteResult::Success(rush) => assert_eq!(rush.rush_duration_hours, Some(24)),
			other => panic!("expected rush offer, got {:?}", other),
		}
	}

	#[test]
	fn test_unknown_system_classification() {
		let (kind, _) = source().classify(&AdapterError::UnknownSystem {
			name: "Nowhere".to_string(),
		});
		assert_eq!(kind, ErrorKind::SystemNotFound);
	}
}
