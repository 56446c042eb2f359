//! Red, Purple and Black Frog calculators

use async_trait::async_trait;
use haul_types::{
	AdapterError, AdapterResult, ErrorKind, ProviderDetails, QuoteOffer, QuoteResult,
	RouteParameters,
};
use std::fmt;
use std::sync::Arc;

use super::classified;
use crate::gateways::{FrogApi, FrogCalculator, FrogQuote};
use crate::provider::{Classified, QuoteSource};

/// Rush contracts on the red calculator complete within four hours
const RED_RUSH_HOURS: u32 = 4;

/// Map Red Frog error text onto the failure taxonomy
pub fn classify_frog_error(error: &AdapterError) -> Classified {
	match error.upstream_message() {
		Some(message) if message.starts_with("No contiguous High Sec route found") => {
			classified(ErrorKind::RouteNotContiguousHighsec)
		},
		Some(message) if message.contains("not found in our database") => {
			classified(ErrorKind::SystemNotFound)
		},
		_ => classified(ErrorKind::RouteUnavailable),
	}
}

pub struct FrogSource {
	api: Arc<dyn FrogApi>,
	calculator: FrogCalculator,
}

impl fmt::Debug for FrogSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FrogSource")
			.field("calculator", &self.calculator)
			.finish()
	}
}

impl FrogSource {
	pub fn new(api: Arc<dyn FrogApi>, calculator: FrogCalculator) -> Self {
		Self { api, calculator }
	}
}

#[async_trait]
impl QuoteSource for FrogSource {
	type Raw = FrogQuote;

	async fn fetch(&self, params: &RouteParameters) -> AdapterResult<FrogQuote> {
		let collateral = self
			.calculator
			.takes_collateral()
			.then_some(params.collateral);
		self.api
			.quote(
				self.calculator,
				&params.origin,
				&params.destination,
				collateral,
			)
			.await
	}

	fn normalize(
		&self,
		raw: FrogQuote,
		_params: &RouteParameters,
		details: &ProviderDetails,
	) -> Vec<QuoteResult> {
		let standard = QuoteOffer::new(
			details,
			raw.reward_base,
			raw.days_to_complete,
			raw.days_expiration,
		);

		match (self.calculator, raw.reward_rush) {
			(FrogCalculator::Red, Some(rush_reward)) => vec![
				standard.into(),
				QuoteOffer::new(details, rush_reward, 1, raw.days_expiration)
					.with_rush_hours(RED_RUSH_HOURS)
					.into(),
			],
			_ => vec![standard.into()],
		}
	}

	fn classify(&self, error: &AdapterError) -> Classified {
		classify_frog_error(error)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::gateways::MockFrogApi;
	use haul_types::ProviderId;

	fn upstream(message: &str) -> AdapterError {
		AdapterError::Upstream {
			message: message.to_string(),
		}
	}

	fn quote() -> FrogQuote {
		FrogQuote {
			reward_base: 12_000_000.0,
			reward_rush: Some(24_000_000.0),
			days_to_complete: 3,
			days_expiration: 7,
			distance: Some(6.2),
		}
	}

	fn params() -> RouteParameters {
		RouteParameters {
			origin: "Jita".to_string(),
			destination: "Amarr".to_string(),
			volume: 10_000.0,
			collateral: 500_000_000.0,
			providers: None,
		}
	}

	#[test]
	fn test_error_classification() {
		assert_eq!(
			classify_frog_error(&upstream("No contiguous High Sec route found between A and B")).0,
			ErrorKind::RouteNotContiguousHighsec
		);
		let (kind, message) = classify_frog_error(&upstream("System Foo not found in our database"));
		assert_eq!(kind, ErrorKind::SystemNotFound);
		assert_eq!(message, "System does not exist.");
		assert_eq!(
			classify_frog_error(&upstream("Something else")).0,
			ErrorKind::RouteUnavailable
		);
		assert_eq!(
			classify_frog_error(&AdapterError::invalid_response("bad json")).1,
			"Route not available."
		);
	}

	#[test]
	fn test_red_produces_rush_entry() {
		let source = FrogSource::new(Arc::new(MockFrogApi::new()), FrogCalculator::Red);
		let results = source.normalize(quote(), &params(), &ProviderId::RedFrog.details());
		assert_eq!(results.len(), 2);
		match &results[1] {
			QuoteResult::Success(rush) => {
				assert_eq!(rush.reward, 24_000_000.0);
				assert_eq!(rush.days_to_complete, 1);
				assert_eq!(rush.days_expiration, 7);
				assert_eq!(rush.rush_duration_hours, Some(4));
			},
			other => panic!("expected rush offer, got {:?}", other),
		}
	}

	#[test]
	fn test_purple_and_black_are_single_entry() {
		for calculator in [FrogCalculator::Purple, FrogCalculator::Black] {
			let source = FrogSource::new(Arc::new(MockFrogApi::new()), calculator);
			let results = source.normalize(quote(), &params(), &ProviderId::BlackFrog.details());
			assert_eq!(results.len(), 1);
			assert!(results[0].is_success());
		}
	}

	#[tokio::test]
	async fn test_collateral_only_sent_where_accepted() {
		let mut api = MockFrogApi::new();
		api.expect_quote()
			.withf(|calculator, _, _, collateral| match calculator {
				FrogCalculator::Red => collateral.is_none(),
				_ => *collateral == Some(500_000_000.0),
			})
			.times(2)
			.returning(|_, _, _, _| Ok(quote()));
		let api: Arc<dyn FrogApi> = Arc::new(api);

		FrogSource::new(api.clone(), FrogCalculator::Red)
			.fetch(&params())
			.await
			.unwrap();
		FrogSource::new(api, FrogCalculator::Purple)
			.fetch(&params())
			.await
			.unwrap();
	}
}
