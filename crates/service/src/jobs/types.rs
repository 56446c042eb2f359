//! Background job types and definitions

use haul_types::{DistanceJob, DistanceMetric};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during job processing
#[derive(Debug, Error)]
pub enum JobError {
	#[error("Job processing failed: {message}")]
	ProcessingFailed { message: String },

	#[error("Job queue is full")]
	QueueFull,

	#[error("Job with ID '{id}' is already active or queued")]
	Duplicate { id: String },

	#[error("Job processor is shutting down")]
	ShuttingDown,

	#[error("Storage error: {0}")]
	Storage(String),

	#[error("Adapter error: {0}")]
	Adapter(String),
}

/// Result type for job operations
pub type JobResult<T = ()> = Result<T, JobError>;

/// Background job types that can be processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BackgroundJob {
	/// Resolve one distance metric for an origin/destination pair
	ResolveDistance(DistanceJob),
}

impl BackgroundJob {
	/// Get a human-readable description of the job
	pub fn description(&self) -> String {
		match self {
			BackgroundJob::ResolveDistance(job) => match job.metric {
				DistanceMetric::Gates => {
					format!("Resolve gate route {} -> {}", job.origin, job.destination)
				},
				DistanceMetric::Lightyears => {
					format!("Resolve lightyears {} -> {}", job.origin, job.destination)
				},
			},
		}
	}

	/// Deduplication id, shared with the job record key in the cache
	pub fn dedup_id(&self) -> String {
		match self {
			BackgroundJob::ResolveDistance(job) => job.key(),
		}
	}
}
