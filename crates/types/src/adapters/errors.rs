//! Error types for upstream adapter calls

use thiserror::Error;

use crate::storage::StorageError;

/// Failure talking to an upstream service
///
/// Provider adapters classify these into an [`crate::ErrorKind`] before they
/// reach a response; they never abort an aggregation.
#[derive(Error, Debug)]
pub enum AdapterError {
	#[error("HTTP request failed: {0}")]
	HttpError(#[from] reqwest::Error),

	#[error("HTTP {status_code}: {body}")]
	HttpStatusError { status_code: u16, body: String },

	/// The upstream answered with its own error text
	#[error("Upstream rejected request: {message}")]
	Upstream { message: String },

	#[error("Invalid response format: {reason}")]
	InvalidResponse { reason: String },

	#[error("Unknown system: {name}")]
	UnknownSystem { name: String },

	#[error("Rate limit exceeded for {limiter}")]
	RateLimitExceeded { limiter: String },

	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl AdapterError {
	/// Extract HTTP status code from the error if available
	pub fn status_code(&self) -> Option<u16> {
		match self {
			AdapterError::HttpStatusError { status_code, .. } => Some(*status_code),
			AdapterError::HttpError(reqwest_error) => {
				reqwest_error.status().map(|status| status.as_u16())
			},
			_ => None,
		}
	}

	pub fn invalid_response(reason: impl Into<String>) -> Self {
		Self::InvalidResponse {
			reason: reason.into(),
		}
	}

	/// Upstream-provided error text, if the failure carried any
	pub fn upstream_message(&self) -> Option<&str> {
		match self {
			AdapterError::Upstream { message } => Some(message),
			_ => None,
		}
	}
}
