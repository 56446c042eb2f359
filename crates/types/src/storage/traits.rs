//! Cache store trait shared by every backend

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::StorageResult;

/// Key-value cache holding JSON values with optional expiry
///
/// Expired entries must never be returned by any read, whether or not the
/// backend has physically removed them yet.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
	/// Get a live value
	async fn get(&self, key: &str) -> StorageResult<Option<Value>>;

	/// Store a value, replacing any previous one. `None` keeps it forever.
	async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> StorageResult<()>;

	/// Store a value only when no live value exists under the key.
	/// Returns whether the value was written.
	async fn set_if_absent(
		&self,
		key: &str,
		value: Value,
		ttl: Option<Duration>,
	) -> StorageResult<bool>;

	/// Live entries whose key starts with `prefix`, at most `limit` of them
	async fn scan_prefix(&self, prefix: &str, limit: usize) -> StorageResult<Vec<(String, Value)>>;

	/// Number of live keys under `prefix`, counting no further than `limit`
	async fn count_prefix(&self, prefix: &str, limit: usize) -> StorageResult<usize> {
		Ok(self.scan_prefix(prefix, limit).await?.len())
	}

	async fn delete(&self, key: &str) -> StorageResult<bool>;

	/// Health check for the storage system
	async fn health_check(&self) -> StorageResult<bool>;

	/// Start any background tasks associated with the backend (e.g., TTL cleanup).
	/// Default implementation does nothing.
	async fn start_background_tasks(&self) -> StorageResult<()> {
		Ok(())
	}
}

/// Typed helpers over [`CacheStore`]
#[async_trait]
pub trait CacheStoreExt {
	async fn get_json<T>(&self, key: &str) -> StorageResult<Option<T>>
	where
		T: DeserializeOwned + Send;

	async fn set_json<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> StorageResult<()>
	where
		T: Serialize + Sync;
}

#[async_trait]
impl<S> CacheStoreExt for S
where
	S: CacheStore + ?Sized,
{
	async fn get_json<T>(&self, key: &str) -> StorageResult<Option<T>>
	where
		T: DeserializeOwned + Send,
	{
		match self.get(key).await? {
			Some(value) => Ok(Some(serde_json::from_value(value)?)),
			None => Ok(None),
		}
	}

	async fn set_json<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> StorageResult<()>
	where
		T: Serialize + Sync,
	{
		let value = serde_json::to_value(value)?;
		self.set(key, value, ttl).await
	}
}
