//! In-memory cache store using DashMap with TTL support, partitioned by key namespace

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::mapref::multiple::RefMulti;
use dashmap::DashMap;
use haul_types::storage::{CacheStore, StorageResult};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::debug;

/// Default interval between expired-entry sweeps
const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CacheEntry {
	value: Value,
	expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
	fn new(value: Value, ttl: Option<Duration>) -> Self {
		let expires_at = ttl.and_then(|ttl| {
			chrono::Duration::from_std(ttl)
				.ok()
				.and_then(|ttl| Utc::now().checked_add_signed(ttl))
		});
		Self { value, expires_at }
	}

	fn is_expired(&self, now: DateTime<Utc>) -> bool {
		self.expires_at.is_some_and(|expires_at| expires_at <= now)
	}
}

/// Entries sharing one key namespace
type Partition = DashMap<String, CacheEntry>;

/// Namespace of a key: the text before its first `:`, or the whole key
fn namespace(key: &str) -> &str {
	key.split_once(':').map_or(key, |(namespace, _)| namespace)
}

/// In-memory cache for a single process
///
/// Entries are partitioned by namespace so prefix scans such as rate marker
/// counts only walk their own namespace. Expired entries are invisible to
/// reads immediately and physically removed by a periodic sweeper.
#[derive(Clone)]
pub struct MemoryStore {
	partitions: Arc<DashMap<String, Arc<Partition>>>,
	cleanup_interval: Duration,
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryStore {
	/// Create a new memory store instance
	pub fn new() -> Self {
		Self::with_cleanup_interval(DEFAULT_CLEANUP_INTERVAL)
	}

	pub fn with_cleanup_interval(cleanup_interval: Duration) -> Self {
		Self {
			partitions: Arc::new(DashMap::new()),
			cleanup_interval,
		}
	}

	/// Start the TTL cleanup task for expired entries
	pub fn start_ttl_cleanup(&self) -> tokio::task::JoinHandle<()> {
		let store = self.clone();
		tokio::spawn(async move {
			let mut cleanup_interval = interval(store.cleanup_interval);

			loop {
				cleanup_interval.tick().await;
				store.cleanup_expired();
			}
		})
	}

	/// Remove expired entries now, returning how many were dropped
	pub fn cleanup_expired(&self) -> usize {
		let now = Utc::now();
		let mut removed = 0;
		// Emptied partitions stay registered; writers may hold them
		for partition in self.all_partitions() {
			let before = partition.len();
			partition.retain(|_, entry| !entry.is_expired(now));
			removed += before.saturating_sub(partition.len());
		}

		if removed > 0 {
			debug!("Cleaned up {} expired cache entries", removed);
		}
		removed
	}

	/// Number of stored entries, including expired ones not yet swept
	pub fn len(&self) -> usize {
		self.all_partitions().iter().map(|p| p.len()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.all_partitions().iter().all(|p| p.is_empty())
	}

	fn all_partitions(&self) -> Vec<Arc<Partition>> {
		self.partitions
			.iter()
			.map(|partition| Arc::clone(partition.value()))
			.collect()
	}

	fn partition(&self, key: &str) -> Option<Arc<Partition>> {
		self.partitions
			.get(namespace(key))
			.map(|partition| Arc::clone(partition.value()))
	}

	fn partition_or_insert(&self, key: &str) -> Arc<Partition> {
		Arc::clone(
			self.partitions
				.entry(namespace(key).to_string())
				.or_default()
				.value(),
		)
	}

	/// Partitions whose keys can start with `prefix`
	fn partitions_matching(&self, prefix: &str) -> Vec<Arc<Partition>> {
		if prefix.contains(':') {
			return self.partition(prefix).into_iter().collect();
		}
		self.partitions
			.iter()
			.filter(|partition| partition.key().starts_with(prefix))
			.map(|partition| Arc::clone(partition.value()))
			.collect()
	}

	fn live_with_prefix<'a>(
		partition: &'a Partition,
		prefix: &'a str,
		now: DateTime<Utc>,
	) -> impl Iterator<Item = RefMulti<'a, String, CacheEntry>> + 'a {
		partition
			.iter()
			.filter(move |entry| entry.key().starts_with(prefix) && !entry.value().is_expired(now))
	}
}

#[async_trait]
impl CacheStore for MemoryStore {
	async fn get(&self, key: &str) -> StorageResult<Option<Value>> {
		let Some(partition) = self.partition(key) else {
			return Ok(None);
		};
		let now = Utc::now();
		let value = partition
			.get(key)
			.filter(|entry| !entry.is_expired(now))
			.map(|entry| entry.value.clone());
		Ok(value)
	}

	async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> StorageResult<()> {
		self.partition_or_insert(key)
			.insert(key.to_string(), CacheEntry::new(value, ttl));
		Ok(())
	}

	async fn set_if_absent(
		&self,
		key: &str,
		value: Value,
		ttl: Option<Duration>,
	) -> StorageResult<bool> {
		let now = Utc::now();
		let partition = self.partition_or_insert(key);
		let inserted = match partition.entry(key.to_string()) {
			Entry::Occupied(mut occupied) => {
				if occupied.get().is_expired(now) {
					occupied.insert(CacheEntry::new(value, ttl));
					true
				} else {
					false
				}
			},
			Entry::Vacant(vacant) => {
				vacant.insert(CacheEntry::new(value, ttl));
				true
			},
		};
		Ok(inserted)
	}

	async fn scan_prefix(&self, prefix: &str, limit: usize) -> StorageResult<Vec<(String, Value)>> {
		let now = Utc::now();
		let mut found = Vec::new();
		for partition in self.partitions_matching(prefix) {
			found.extend(
				Self::live_with_prefix(&partition, prefix, now)
					.take(limit - found.len())
					.map(|entry| (entry.key().clone(), entry.value().value.clone())),
			);
			if found.len() >= limit {
				break;
			}
		}
		Ok(found)
	}

	async fn count_prefix(&self, prefix: &str, limit: usize) -> StorageResult<usize> {
		let now = Utc::now();
		let mut count = 0;
		for partition in self.partitions_matching(prefix) {
			count += Self::live_with_prefix(&partition, prefix, now)
				.take(limit - count)
				.count();
			if count >= limit {
				break;
			}
		}
		Ok(count)
	}

	async fn delete(&self, key: &str) -> StorageResult<bool> {
		Ok(self
			.partition(key)
			.is_some_and(|partition| partition.remove(key).is_some()))
	}

	async fn health_check(&self) -> StorageResult<bool> {
		// For in-memory storage, just check if the map is accessible
		Ok(true)
	}

	async fn start_background_tasks(&self) -> StorageResult<()> {
		self.start_ttl_cleanup();
		Ok(())
	}
}
