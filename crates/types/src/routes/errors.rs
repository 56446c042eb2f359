//! Error types for route requests

use thiserror::Error;

/// Validation errors for incoming route requests
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
	#[error("Missing required parameter: {field}")]
	MissingParameter { field: String },

	#[error("Invalid number for {field}: {value}")]
	InvalidNumber { field: String, value: String },

	#[error("{field} must be positive, got {value}")]
	NonPositive { field: String, value: f64 },
}

impl ValidationError {
	/// Short label sent as the `error` field of a 400 response
	pub fn label(&self) -> &'static str {
		match self {
			ValidationError::MissingParameter { .. } => "Missing parameter.",
			ValidationError::InvalidNumber { .. } | ValidationError::NonPositive { .. } => {
				"Invalid parameter."
			},
		}
	}

	pub fn missing(field: &str) -> Self {
		Self::MissingParameter {
			field: field.to_string(),
		}
	}
}
