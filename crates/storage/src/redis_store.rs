//! Redis cache store for deployments sharing one cache across processes

use async_trait::async_trait;
use haul_types::storage::{CacheStore, StorageError, StorageResult};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Keys requested per SCAN round trip
const SCAN_BATCH: usize = 100;

fn redis_error(err: RedisError) -> StorageError {
	if err.is_connection_dropped() || err.is_connection_refusal() || err.is_io_error() {
		StorageError::Connection {
			message: err.to_string(),
		}
	} else {
		StorageError::Operation {
			message: err.to_string(),
		}
	}
}

/// Escape glob metacharacters so a key prefix matches literally in SCAN MATCH
fn glob_escape(prefix: &str) -> String {
	let mut escaped = String::with_capacity(prefix.len() + 1);
	for c in prefix.chars() {
		if matches!(c, '*' | '?' | '[' | ']' | '\\') {
			escaped.push('\\');
		}
		escaped.push(c);
	}
	escaped.push('*');
	escaped
}

/// TTL rounded up to whole seconds, never zero
fn ttl_seconds(ttl: Duration) -> u64 {
	let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
	secs.max(1)
}

/// Redis-backed cache store
#[derive(Clone)]
pub struct RedisStore {
	conn: ConnectionManager,
}

impl RedisStore {
	/// Connect to Redis at the given URL
	pub async fn connect(connection_url: &str) -> StorageResult<Self> {
		let client = Client::open(connection_url).map_err(redis_error)?;
		let conn = ConnectionManager::new(client).await.map_err(redis_error)?;

		info!("Redis cache connected to {}", connection_url);

		Ok(Self { conn })
	}

	async fn scan_keys(&self, prefix: &str, limit: usize) -> StorageResult<Vec<String>> {
		let mut conn = self.conn.clone();
		let pattern = glob_escape(prefix);
		let mut cursor: u64 = 0;
		let mut keys = Vec::new();

		loop {
			let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
				.arg(cursor)
				.arg("MATCH")
				.arg(&pattern)
				.arg("COUNT")
				.arg(SCAN_BATCH)
				.query_async(&mut conn)
				.await
				.map_err(redis_error)?;

			for key in batch {
				if keys.len() >= limit {
					return Ok(keys);
				}
				keys.push(key);
			}

			if next == 0 {
				return Ok(keys);
			}
			cursor = next;
		}
	}
}

#[async_trait]
impl CacheStore for RedisStore {
	async fn get(&self, key: &str) -> StorageResult<Option<Value>> {
		let mut conn = self.conn.clone();
		let raw: Option<String> = conn.get(key).await.map_err(redis_error)?;
		match raw {
			Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
			None => Ok(None),
		}
	}

	async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> StorageResult<()> {
		let mut conn = self.conn.clone();
		let raw = serde_json::to_string(&value)?;
		match ttl {
			Some(ttl) => conn
				.set_ex::<_, _, ()>(key, raw, ttl_seconds(ttl))
				.await
				.map_err(redis_error)?,
			None => conn.set::<_, _, ()>(key, raw).await.map_err(redis_error)?,
		}
		Ok(())
	}

	async fn set_if_absent(
		&self,
		key: &str,
		value: Value,
		ttl: Option<Duration>,
	) -> StorageResult<bool> {
		let mut conn = self.conn.clone();
		let raw = serde_json::to_string(&value)?;
		let mut cmd = redis::cmd("SET");
		cmd.arg(key).arg(raw).arg("NX");
		if let Some(ttl) = ttl {
			cmd.arg("EX").arg(ttl_seconds(ttl));
		}

		// SET NX replies OK when written and nil when the key already exists
		let reply: Option<String> = cmd.query_async(&mut conn).await.map_err(redis_error)?;
		let written = reply.is_some();
		debug!(key, written, "Redis SET NX");
		Ok(written)
	}

	async fn scan_prefix(&self, prefix: &str, limit: usize) -> StorageResult<Vec<(String, Value)>> {
		let keys = self.scan_keys(prefix, limit).await?;
		let mut entries = Vec::with_capacity(keys.len());
		for key in keys {
			// A key may expire between SCAN and GET
			if let Some(value) = self.get(&key).await? {
				entries.push((key, value));
			}
		}
		Ok(entries)
	}

	async fn count_prefix(&self, prefix: &str, limit: usize) -> StorageResult<usize> {
		Ok(self.scan_keys(prefix, limit).await?.len())
	}

	async fn delete(&self, key: &str) -> StorageResult<bool> {
		let mut conn = self.conn.clone();
		let removed: i64 = conn.del(key).await.map_err(redis_error)?;
		Ok(removed > 0)
	}

	async fn health_check(&self) -> StorageResult<bool> {
		let mut conn = self.conn.clone();
		let pong: String = redis::cmd("PING")
			.query_async(&mut conn)
			.await
			.map_err(redis_error)?;
		Ok(pong == "PONG")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_glob_escape() {
		assert_eq!(glob_escape("apirate:push:"), "apirate:push:*");
		assert_eq!(glob_escape("distance:a*b:"), "distance:a\\*b:*");
	}

	#[test]
	fn test_ttl_seconds_rounds_up() {
		assert_eq!(ttl_seconds(Duration::from_millis(1)), 1);
		assert_eq!(ttl_seconds(Duration::from_millis(1500)), 2);
		assert_eq!(ttl_seconds(Duration::from_secs(600)), 600);
	}
}
