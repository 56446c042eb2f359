//! Semantic failure kinds reported per provider

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a provider did not produce an offer
///
/// These are expected business outcomes carried inside a response, not
/// request-level errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
	/// Volume or collateral above the provider's hard cap
	LimitExceeded,
	RouteNotContiguousHighsec,
	SystemNotFound,
	/// Generic upstream rejection, also used for transport failures
	RouteUnavailable,
	/// Local admission control refused the upstream call
	RateLimited,
	NullsecNotServed,
	/// The local pricing formula refused the contract
	PricingRejected,
}

impl ErrorKind {
	/// Message used when the upstream did not supply a better one
	pub fn default_message(&self) -> &'static str {
		match self {
			ErrorKind::LimitExceeded => "Limit exceeded.",
			ErrorKind::RouteNotContiguousHighsec => "Route must be in contiguous Highsec.",
			ErrorKind::SystemNotFound => "System does not exist.",
			ErrorKind::RouteUnavailable => "Route not available.",
			ErrorKind::RateLimited => "API rate limit exhausted. Try again later.",
			ErrorKind::NullsecNotServed => "Only highsec and lowsec allowed.",
			ErrorKind::PricingRejected => "Contract rejected.",
		}
	}

	/// Rejections that will not change on retry and are worth caching
	pub fn is_stable(&self) -> bool {
		matches!(
			self,
			ErrorKind::RouteNotContiguousHighsec
				| ErrorKind::SystemNotFound
				| ErrorKind::NullsecNotServed
		)
	}
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			ErrorKind::LimitExceeded => "limitExceeded",
			ErrorKind::RouteNotContiguousHighsec => "routeNotContiguousHighsec",
			ErrorKind::SystemNotFound => "systemNotFound",
			ErrorKind::RouteUnavailable => "routeUnavailable",
			ErrorKind::RateLimited => "rateLimited",
			ErrorKind::NullsecNotServed => "nullsecNotServed",
			ErrorKind::PricingRejected => "pricingRejected",
		};
		f.write_str(name)
	}
}
