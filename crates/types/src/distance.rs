//! Topology metadata, distance records and the distance job seam

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::cache_keys::{distance_job_key, distance_key};
use crate::constants::limits::HIGHSEC_THRESHOLD;
use crate::storage::StorageError;

/// Static metadata of one solar system, cached indefinitely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
	pub name: String,
	pub system_id: i64,
	pub security_status: f64,
	#[serde(default)]
	pub constellation_id: Option<i64>,
}

impl SystemInfo {
	pub fn is_highsec(&self) -> bool {
		self.security_status >= HIGHSEC_THRESHOLD
	}

	pub fn is_nullsec(&self) -> bool {
		self.security_status < 0.0
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
	/// Stargate hops along the shortest path
	Gates,
	/// Straight-line jump distance reported by a calculator
	Lightyears,
}

impl DistanceMetric {
	pub const ALL: [DistanceMetric; 2] = [DistanceMetric::Gates, DistanceMetric::Lightyears];

	pub fn as_str(&self) -> &'static str {
		match self {
			DistanceMetric::Gates => "gates",
			DistanceMetric::Lightyears => "lightyears",
		}
	}
}

impl fmt::Display for DistanceMetric {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Resolved distance between two systems for one metric
///
/// Records are replaced wholesale by the job that computes them, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceRecord {
	pub origin: String,
	pub destination: String,
	pub metric_type: DistanceMetric,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub jump_count: Option<u32>,
	/// Security status of every system on the path, in path order
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub per_system_security: Option<Vec<f64>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub lightyear_distance: Option<f64>,
}

impl DistanceRecord {
	/// Record for a stargate path given the security of every system on it
	pub fn gates(origin: &str, destination: &str, path_security: Vec<f64>) -> Self {
		let jump_count = path_security.len().saturating_sub(1) as u32;
		Self {
			origin: origin.to_string(),
			destination: destination.to_string(),
			metric_type: DistanceMetric::Gates,
			jump_count: Some(jump_count),
			per_system_security: Some(path_security),
			lightyear_distance: None,
		}
	}

	pub fn lightyears(origin: &str, destination: &str, distance: f64) -> Self {
		Self {
			origin: origin.to_string(),
			destination: destination.to_string(),
			metric_type: DistanceMetric::Lightyears,
			jump_count: None,
			per_system_security: None,
			lightyear_distance: Some(distance),
		}
	}

	pub fn cache_key(&self) -> String {
		distance_key(&self.origin, &self.destination, self.metric_type)
	}

	/// True when no system on the path drops below highsec
	pub fn is_highsec_only(&self) -> bool {
		self.per_system_security
			.as_ref()
			.map(|path| path.iter().all(|s| *s >= HIGHSEC_THRESHOLD))
			.unwrap_or(false)
	}
}

/// Distance records attached to a route response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distances {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gates: Option<DistanceRecord>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub lightyears: Option<DistanceRecord>,
}

impl Distances {
	pub fn from_records(records: impl IntoIterator<Item = DistanceRecord>) -> Self {
		let mut distances = Distances::default();
		for record in records {
			match record.metric_type {
				DistanceMetric::Gates => distances.gates = Some(record),
				DistanceMetric::Lightyears => distances.lightyears = Some(record),
			}
		}
		distances
	}

	pub fn is_empty(&self) -> bool {
		self.gates.is_none() && self.lightyears.is_none()
	}
}

/// Outcome of reading cached distances for a pair
#[derive(Debug, Clone, PartialEq)]
pub enum DistanceLookup {
	Found(Distances),
	/// Nothing resolved yet; callers enqueue jobs and omit the metric
	Missing,
}

/// Idempotent unit of distance resolution work
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceJob {
	pub origin: String,
	pub destination: String,
	pub metric: DistanceMetric,
}

impl DistanceJob {
	pub fn new(origin: &str, destination: &str, metric: DistanceMetric) -> Self {
		Self {
			origin: origin.to_string(),
			destination: destination.to_string(),
			metric,
		}
	}

	/// Key of the job record, also used as the deduplication id
	pub fn key(&self) -> String {
		distance_job_key(&self.origin, &self.destination, self.metric)
	}

	/// Key the finished job writes its record to
	pub fn record_key(&self) -> String {
		distance_key(&self.origin, &self.destination, self.metric)
	}
}

#[derive(Error, Debug)]
pub enum EnqueueError {
	#[error("Failed to record distance job: {0}")]
	Storage(#[from] StorageError),

	#[error("Job queue unavailable: {message}")]
	QueueUnavailable { message: String },
}

/// Accepts distance jobs for background resolution
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait DistanceJobSink: Send + Sync {
	/// Enqueue the job unless an identical one is already pending.
	/// Returns whether a new job was submitted.
	async fn enqueue(&self, job: DistanceJob) -> Result<bool, EnqueueError>;
}
