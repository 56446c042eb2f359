//! Sliding-window admission control backed by the shared cache
//!
//! Every admitted call leaves a marker that expires after the window. The
//! live markers under a limiter's prefix are the calls made in the last
//! window. Counting and creating are two separate cache operations, so a
//! burst of concurrent callers can overshoot the limit by a few calls.

use chrono::Utc;
use haul_types::cache_keys::{rate_marker_key, rate_marker_prefix};
use haul_types::{CacheStore, StorageError};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum RateLimitError {
	#[error("Rate limit of {limit} calls exhausted for {limiter}")]
	Exhausted { limiter: String, limit: usize },

	#[error("Rate limiter storage error: {0}")]
	Storage(#[from] StorageError),
}

#[derive(Clone)]
pub struct RateLimiter {
	store: Arc<dyn CacheStore>,
	name: String,
	limit: usize,
	window: Duration,
}

impl std::fmt::Debug for RateLimiter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RateLimiter")
			.field("name", &self.name)
			.field("limit", &self.limit)
			.field("window", &self.window)
			.finish()
	}
}

impl RateLimiter {
	pub fn new(store: Arc<dyn CacheStore>, name: &str, limit: usize, window: Duration) -> Self {
		Self {
			store,
			name: name.to_string(),
			limit,
			window,
		}
	}

	/// Admit one call or fail immediately; never waits for capacity
	pub async fn try_acquire(&self) -> Result<(), RateLimitError> {
		let prefix = rate_marker_prefix(&self.name);
		let used = self.store.count_prefix(&prefix, self.limit).await?;

		if used >= self.limit {
			warn!(
				limiter = %self.name,
				used,
				limit = self.limit,
				"Rate limit exhausted"
			);
			return Err(RateLimitError::Exhausted {
				limiter: self.name.clone(),
				limit: self.limit,
			});
		}

		let now = Utc::now();
		let key = rate_marker_key(
			&self.name,
			now.timestamp_millis(),
			&Uuid::new_v4().to_string(),
		);
		self.store
			.set(&key, json!({ "date": now.to_rfc3339() }), Some(self.window))
			.await?;

		debug!(limiter = %self.name, used = used + 1, "Rate limit marker created");
		Ok(())
	}
}
