//! Route request models and validation

use serde::{Deserialize, Serialize};

use crate::providers::ProviderId;

pub mod errors;
pub use errors::ValidationError;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Raw `/api/route` query string
///
/// Every field is optional at this layer so that an absent value surfaces as
/// our own validation error instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RouteQuery {
	pub origin: Option<String>,
	pub destination: Option<String>,
	pub volume: Option<String>,
	pub collateral: Option<String>,
	pub providers: Option<String>,
}

impl RouteQuery {
	/// Validate the raw query into typed route parameters
	pub fn into_parameters(self) -> ValidationResult<RouteParameters> {
		let origin = required_text(self.origin, "origin")?;
		let destination = required_text(self.destination, "destination")?;
		let volume = required_number(self.volume, "volume")?;
		let collateral = required_number(self.collateral, "collateral")?;

		// An empty `providers` value means "use the defaults", a non-empty one
		// is honoured even when none of its names are known.
		let providers = self
			.providers
			.filter(|raw| !raw.trim().is_empty())
			.map(|raw| ProviderId::parse_list(&raw));

		Ok(RouteParameters {
			origin,
			destination,
			volume,
			collateral,
			providers,
		})
	}
}

fn required_text(value: Option<String>, field: &str) -> ValidationResult<String> {
	match value.map(|v| v.trim().to_string()) {
		Some(v) if !v.is_empty() => Ok(v),
		_ => Err(ValidationError::missing(field)),
	}
}

fn required_number(value: Option<String>, field: &str) -> ValidationResult<f64> {
	let raw = required_text(value, field)?;
	let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '_').collect();
	let parsed = cleaned
		.parse::<f64>()
		.map_err(|_| ValidationError::InvalidNumber {
			field: field.to_string(),
			value: raw.clone(),
		})?;

	if !parsed.is_finite() {
		return Err(ValidationError::InvalidNumber {
			field: field.to_string(),
			value: raw,
		});
	}
	// Zero is rejected as missing, matching a falsy value in the query
	if parsed == 0.0 {
		return Err(ValidationError::missing(field));
	}
	if parsed < 0.0 {
		return Err(ValidationError::NonPositive {
			field: field.to_string(),
			value: parsed,
		});
	}
	Ok(parsed)
}

/// Validated parameters of one route quote request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteParameters {
	pub origin: String,
	pub destination: String,
	/// Cargo volume in m³
	pub volume: f64,
	/// Contract collateral in ISK
	pub collateral: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub providers: Option<Vec<ProviderId>>,
}

impl RouteParameters {
	/// Providers this request fans out to
	pub fn selected_providers(&self, defaults: &[ProviderId]) -> Vec<ProviderId> {
		match &self.providers {
			Some(explicit) => explicit.clone(),
			None => defaults.to_vec(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn query() -> RouteQuery {
		RouteQuery {
			origin: Some("Jita".to_string()),
			destination: Some("Amarr".to_string()),
			volume: Some("10000".to_string()),
			collateral: Some("500,000,000".to_string()),
			providers: None,
		}
	}

	#[test]
	fn test_valid_query() {
		let params = query().into_parameters().unwrap();
		assert_eq!(params.origin, "Jita");
		assert_eq!(params.volume, 10_000.0);
		assert_eq!(params.collateral, 500_000_000.0);
		assert_eq!(
			params.selected_providers(&ProviderId::DEFAULTS),
			ProviderId::DEFAULTS.to_vec()
		);
	}

	#[test]
	fn test_missing_fields() {
		let mut q = query();
		q.destination = None;
		let err = q.into_parameters().unwrap_err();
		assert_eq!(err, ValidationError::missing("destination"));
		assert_eq!(err.label(), "Missing parameter.");

		let mut q = query();
		q.volume = Some("  ".to_string());
		assert_eq!(
			q.into_parameters().unwrap_err(),
			ValidationError::missing("volume")
		);

		let mut q = query();
		q.collateral = Some("0".to_string());
		assert_eq!(
			q.into_parameters().unwrap_err(),
			ValidationError::missing("collateral")
		);
	}

	#[test]
	fn test_invalid_numbers() {
		let mut q = query();
		q.volume = Some("lots".to_string());
		assert!(matches!(
			q.into_parameters(),
			Err(ValidationError::InvalidNumber { .. })
		));

		let mut q = query();
		q.collateral = Some("-5".to_string());
		let err = q.into_parameters().unwrap_err();
		assert!(matches!(err, ValidationError::NonPositive { .. }));
		assert_eq!(err.label(), "Invalid parameter.");
	}

	#[test]
	fn test_explicit_providers() {
		let mut q = query();
		q.providers = Some("pushx,haulerschannel".to_string());
		let params = q.into_parameters().unwrap();
		assert_eq!(
			params.selected_providers(&ProviderId::DEFAULTS),
			vec![ProviderId::PushX, ProviderId::HaulersChannel]
		);

		let mut q = query();
		q.providers = Some("nobody".to_string());
		let params = q.into_parameters().unwrap();
		assert!(params.selected_providers(&ProviderId::DEFAULTS).is_empty());

		let mut q = query();
		q.providers = Some(String::new());
		let params = q.into_parameters().unwrap();
		assert_eq!(params.selected_providers(&ProviderId::DEFAULTS).len(), 5);
	}
}
