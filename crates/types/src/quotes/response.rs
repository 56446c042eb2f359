//! Per-provider quote results and the aggregated route response

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::ErrorKind;
use crate::distance::Distances;
use crate::providers::ProviderDetails;

/// A priced offer from one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteOffer {
	pub provider: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	pub reward: f64,
	pub days_to_complete: u32,
	pub days_expiration: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rush_duration_hours: Option<u32>,
	#[serde(default)]
	pub cached: bool,
}

impl QuoteOffer {
	pub fn new(
		details: &ProviderDetails,
		reward: f64,
		days_to_complete: u32,
		days_expiration: u32,
	) -> Self {
		Self {
			provider: details.provider.clone(),
			url: details.url.clone(),
			reward,
			days_to_complete,
			days_expiration,
			rush_duration_hours: None,
			cached: false,
		}
	}

	pub fn with_rush_hours(mut self, hours: u32) -> Self {
		self.rush_duration_hours = Some(hours);
		self
	}
}

/// A provider's refusal, classified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteFailure {
	pub provider: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	pub error_kind: ErrorKind,
	pub error: String,
	#[serde(default)]
	pub cached: bool,
}

impl QuoteFailure {
	pub fn new(details: &ProviderDetails, kind: ErrorKind) -> Self {
		Self::with_message(details, kind, kind.default_message())
	}

	pub fn with_message(
		details: &ProviderDetails,
		kind: ErrorKind,
		message: impl Into<String>,
	) -> Self {
		Self {
			provider: details.provider.clone(),
			url: details.url.clone(),
			error_kind: kind,
			error: message.into(),
			cached: false,
		}
	}
}

/// One entry of a route response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum QuoteResult {
	Success(QuoteOffer),
	Failure(QuoteFailure),
}

impl QuoteResult {
	pub fn provider(&self) -> &str {
		match self {
			QuoteResult::Success(offer) => &offer.provider,
			QuoteResult::Failure(failure) => &failure.provider,
		}
	}

	pub fn is_success(&self) -> bool {
		matches!(self, QuoteResult::Success(_))
	}

	pub fn is_cached(&self) -> bool {
		match self {
			QuoteResult::Success(offer) => offer.cached,
			QuoteResult::Failure(failure) => failure.cached,
		}
	}

	pub fn error_kind(&self) -> Option<ErrorKind> {
		match self {
			QuoteResult::Success(_) => None,
			QuoteResult::Failure(failure) => Some(failure.error_kind),
		}
	}

	/// Whether this entry may be written to the cache
	pub fn is_cacheable(&self) -> bool {
		match self {
			QuoteResult::Success(_) => true,
			QuoteResult::Failure(failure) => failure.error_kind.is_stable(),
		}
	}

	pub fn mark_cached(mut self) -> Self {
		match &mut self {
			QuoteResult::Success(offer) => offer.cached = true,
			QuoteResult::Failure(failure) => failure.cached = true,
		}
		self
	}
}

impl From<QuoteOffer> for QuoteResult {
	fn from(offer: QuoteOffer) -> Self {
		QuoteResult::Success(offer)
	}
}

impl From<QuoteFailure> for QuoteResult {
	fn from(failure: QuoteFailure) -> Self {
		QuoteResult::Failure(failure)
	}
}

/// Aggregated answer to a route request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
	pub providers: Vec<QuoteResult>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub distances: Option<Distances>,
}

impl RouteResponse {
	/// Build a response with successes cheapest first, then failures by provider name
	pub fn new(mut providers: Vec<QuoteResult>, distances: Option<Distances>) -> Self {
		providers.sort_by(compare_results);
		Self {
			providers,
			distances,
		}
	}

	pub fn successes(&self) -> impl Iterator<Item = &QuoteOffer> {
		self.providers.iter().filter_map(|r| match r {
			QuoteResult::Success(offer) => Some(offer),
			QuoteResult::Failure(_) => None,
		})
	}

	pub fn failures(&self) -> impl Iterator<Item = &QuoteFailure> {
		self.providers.iter().filter_map(|r| match r {
			QuoteResult::Failure(failure) => Some(failure),
			QuoteResult::Success(_) => None,
		})
	}
}

fn compare_results(a: &QuoteResult, b: &QuoteResult) -> Ordering {
	match (a, b) {
		(QuoteResult::Success(x), QuoteResult::Success(y)) => x.reward.total_cmp(&y.reward),
		(QuoteResult::Success(_), QuoteResult::Failure(_)) => Ordering::Less,
		(QuoteResult::Failure(_), QuoteResult::Success(_)) => Ordering::Greater,
		(QuoteResult::Failure(x), QuoteResult::Failure(y)) => x.provider.cmp(&y.provider),
	}
}
