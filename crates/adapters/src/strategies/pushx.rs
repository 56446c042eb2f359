//! Push Industries quote API

use async_trait::async_trait;
use haul_types::{
	AdapterError, AdapterResult, ErrorKind, ProviderDetails, QuoteFailure, QuoteOffer,
	QuoteResult, RouteParameters,
};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use crate::gateways::{PushxApi, PushxQuote};
use crate::provider::{Classified, QuoteSource};

const TRANSPORT_FAILURE: &str = "Failed to get quote for Push Industries.";

/// Map a PushX `PriceError` text onto the failure taxonomy
pub fn classify_price_error(text: &str) -> ErrorKind {
	let lower = text.to_lowercase();
	if lower.contains("not found") || lower.contains("unknown") {
		ErrorKind::SystemNotFound
	} else if lower.contains("highsec") {
		ErrorKind::RouteNotContiguousHighsec
	} else {
		ErrorKind::RouteUnavailable
	}
}

/// Parse `"N (M)"` into standard days `N` and rush days `M`
pub fn parse_day_pair(text: &str) -> Option<(u32, u32)> {
	let (standard, rush) = text.split_once('(')?;
	let first_number = |s: &str| -> Option<u32> {
		s.split(|c: char| !c.is_ascii_digit())
			.find(|part| !part.is_empty())?
			.parse()
			.ok()
	};
	Some((first_number(standard)?, first_number(rush)?))
}

pub struct PushxSource {
	api: Arc<dyn PushxApi>,
}

impl fmt::Debug for PushxSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PushxSource").finish_non_exhaustive()
	}
}

impl PushxSource {
	pub fn new(api: Arc<dyn PushxApi>) -> Self {
		Self { api }
	}
}

#[async_trait]
impl QuoteSource for PushxSource {
	type Raw = PushxQuote;

	async fn fetch(&self, params: &RouteParameters) -> AdapterResult<PushxQuote> {
		self.api
			.quote(
				&params.origin,
				&params.destination,
				params.volume,
				params.collateral,
			)
			.await
	}

	fn normalize(
		&self,
		raw: PushxQuote,
		_params: &RouteParameters,
		details: &ProviderDetails,
	) -> Vec<QuoteResult> {
		if let Some(text) = raw.price_error.as_deref().filter(|t| !t.trim().is_empty()) {
			let kind = classify_price_error(text);
			return vec![QuoteFailure::with_message(details, kind, text).into()];
		}

		let parsed: Option<Vec<QuoteResult>> = (|| {
			let (expiration, expiration_rush) = parse_day_pair(raw.days_to_accept.as_deref()?)?;
			let (complete, complete_rush) = parse_day_pair(raw.days_to_complete.as_deref()?)?;
			let standard = QuoteOffer::new(details, raw.price_normal?, complete, expiration);
			let rush = QuoteOffer::new(details, raw.price_rush?, complete_rush, expiration_rush)
				.with_rush_hours(24 * complete_rush);
			Some(vec![standard.into(), rush.into()])
		})();

		parsed.unwrap_or_else(|| {
			warn!("Unexpected PushX response shape: {:?}", raw);
			vec![QuoteFailure::with_message(details, ErrorKind::RouteUnavailable, TRANSPORT_FAILURE)
				.into()]
		})
	}

	fn classify(&self, error: &AdapterError) -> Classified {
		match error.upstream_message() {
			Some(text) => (classify_price_error(text), text.to_string()),
			None => (ErrorKind::RouteUnavailable, TRANSPORT_FAILURE.to_string()),
		}
	}
}
