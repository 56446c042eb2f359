//! Fixed response headers for the JSON API

use axum::{
	http::header::{HeaderName, HeaderValue},
	Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

/// Every response is JSON or plain text consumed by scripts on other origins,
/// so nothing may be framed, sniffed or cached along the way.
const RESPONSE_HEADERS: [(&str, &str); 5] = [
	("x-content-type-options", "nosniff"),
	(
		"content-security-policy",
		"default-src 'none'; frame-ancestors 'none'",
	),
	("referrer-policy", "no-referrer"),
	("cross-origin-resource-policy", "cross-origin"),
	("cache-control", "no-store"),
];

/// Set [`RESPONSE_HEADERS`] on every response that does not already carry them
pub fn with_response_headers<S>(router: Router<S>) -> Router<S>
where
	S: Clone + Send + Sync + 'static,
{
	RESPONSE_HEADERS
		.iter()
		.fold(router, |router, &(name, value)| {
			router.layer(SetResponseHeaderLayer::if_not_present(
				HeaderName::from_static(name),
				HeaderValue::from_static(value),
			))
		})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_header_table_is_valid() {
		for (name, value) in RESPONSE_HEADERS {
			assert!(HeaderName::from_bytes(name.as_bytes()).is_ok(), "{}", name);
			assert!(HeaderValue::from_str(value).is_ok(), "{}", value);
		}
	}
}
