//! Generic job handler with type-safe parameters

use async_trait::async_trait;

use crate::jobs::types::JobResult;

/// Generic trait for job handlers with typed parameters
#[async_trait]
pub trait GenericJobHandler<T>: Send + Sync {
	async fn handle(&self, params: T) -> JobResult<()>;
}

/// Endpoints of a distance resolution job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEndpoints {
	pub origin: String,
	pub destination: String,
}

impl RouteEndpoints {
	pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
		Self {
			origin: origin.into(),
			destination: destination.into(),
		}
	}
}
