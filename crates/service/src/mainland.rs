//! Mainland highsec probe
//!
//! A system counts as mainland when Red Frog can quote a contiguous highsec
//! route from it to Jita. Definite answers are cached without expiry.

use async_trait::async_trait;
use haul_adapters::strategies::classify_frog_error;
use haul_adapters::{AdapterError, FrogApi, FrogCalculator, SystemDirectory};
use haul_types::cache_keys::mainland_key;
use haul_types::constants::limits::{HIGHSEC_THRESHOLD, MAINLAND_PROBE_DESTINATION};
use haul_types::{CacheStore, CacheStoreExt, ErrorKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum MainlandError {
	#[error("Mainland probe failed: {0}")]
	Upstream(#[from] AdapterError),
}

/// Cached probe outcome, also the `/api/mainland` body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainlandStatus {
	pub is_mainland: bool,
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait MainlandTrait: Send + Sync {
	async fn is_mainland_by_name(&self, system_name: &str) -> Result<bool, MainlandError>;

	async fn is_mainland_by_id(&self, system_id: i64) -> Result<bool, MainlandError>;
}

pub struct MainlandService {
	store: Arc<dyn CacheStore>,
	frog: Arc<dyn FrogApi>,
	directory: SystemDirectory,
}

impl MainlandService {
	pub fn new(store: Arc<dyn CacheStore>, frog: Arc<dyn FrogApi>, directory: SystemDirectory) -> Self {
		Self {
			store,
			frog,
			directory,
		}
	}

	async fn remember(&self, key: &str, is_mainland: bool) {
		if let Err(e) = self
			.store
			.set_json(key, &MainlandStatus { is_mainland }, None)
			.await
		{
			warn!("Failed to cache {}: {}", key, e);
		}
	}
}

#[async_trait]
impl MainlandTrait for MainlandService {
	async fn is_mainland_by_name(&self, system_name: &str) -> Result<bool, MainlandError> {
		let name = system_name.to_lowercase();
		let key = mainland_key(&name);

		match self.store.get_json::<MainlandStatus>(&key).await {
			Ok(Some(status)) => return Ok(status.is_mainland),
			Ok(None) => {},
			Err(e) => warn!("Failed to read {}: {}", key, e),
		}

		let probe = self
			.frog
			.quote(FrogCalculator::Red, &name, MAINLAND_PROBE_DESTINATION, None)
			.await;

		match probe {
			Ok(_) => {
				self.remember(&key, true).await;
				Ok(true)
			},
			Err(error) => match classify_frog_error(&error).0 {
				ErrorKind::RouteNotContiguousHighsec | ErrorKind::SystemNotFound => {
					debug!("{} is not connected to mainland highsec", name);
					self.remember(&key, false).await;
					Ok(false)
				},
				_ => Err(MainlandError::Upstream(error)),
			},
		}
	}

	async fn is_mainland_by_id(&self, system_id: i64) -> Result<bool, MainlandError> {
		let info = self.directory.system_info(system_id).await?;
		if info.security_status < HIGHSEC_THRESHOLD {
			return Ok(false);
		}
		self.is_mainland_by_name(&info.name).await
	}
}
