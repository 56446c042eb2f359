//! Background job processor implementation

use async_trait::async_trait;
use futures::FutureExt;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::types::{BackgroundJob, JobError, JobResult};

/// Trait for handling different types of background jobs
#[async_trait]
pub trait JobHandler: Send + Sync {
	/// Handle a background job
	async fn handle(&self, job: BackgroundJob) -> JobResult;
}

/// Retry policy configuration for jobs
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
	/// Maximum number of retry attempts
	pub max_retries: u32,
	/// Delay between retries in seconds
	pub retry_delay_seconds: u64,
	/// Exponential backoff multiplier (1.0 = fixed delay, >1.0 = exponential)
	pub backoff_multiplier: f32,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_retries: 1,
			retry_delay_seconds: 2,
			backoff_multiplier: 1.0,
		}
	}
}

impl RetryPolicy {
	fn delay_for(&self, attempt: u32) -> Duration {
		let seconds =
			self.retry_delay_seconds as f32 * self.backoff_multiplier.powi(attempt as i32);
		Duration::from_secs_f32(seconds.max(0.0))
	}
}

/// Configuration for the job processor
#[derive(Debug, Clone)]
pub struct JobProcessorConfig {
	/// Maximum number of jobs that can be queued
	pub queue_capacity: usize,
	/// Number of worker tasks to spawn
	pub worker_count: usize,
}

impl Default for JobProcessorConfig {
	fn default() -> Self {
		Self {
			queue_capacity: 256,
			worker_count: 2,
		}
	}
}

/// Internal job execution request
#[derive(Debug, Clone)]
struct JobRequest {
	job: BackgroundJob,
	job_id: Option<String>,
	retry_policy: Option<RetryPolicy>,
	attempt: u32,
}

/// Background job processor backed by a bounded tokio channel and a worker pool
///
/// Jobs submitted with an id are deduplicated: while a job with that id is
/// queued, running or waiting for a retry, further submissions are rejected
/// with [`JobError::Duplicate`].
pub struct JobProcessor {
	sender: RwLock<Option<mpsc::Sender<JobRequest>>>,
	workers: Mutex<Vec<JoinHandle<()>>>,
	active_job_ids: Arc<RwLock<HashSet<String>>>,
}

impl JobProcessor {
	/// Create a new job processor with the given handler and configuration
	pub fn new(handler: Arc<dyn JobHandler>, config: JobProcessorConfig) -> Self {
		let (job_sender, job_receiver) = mpsc::channel::<JobRequest>(config.queue_capacity.max(1));
		let job_receiver = Arc::new(Mutex::new(job_receiver));
		let active_job_ids = Arc::new(RwLock::new(HashSet::new()));

		let mut workers = Vec::with_capacity(config.worker_count);
		for worker_id in 0..config.worker_count.max(1) {
			let handler = Arc::clone(&handler);
			let job_receiver = Arc::clone(&job_receiver);
			let active_job_ids = Arc::clone(&active_job_ids);
			// Weak so that dropping the processor's sender closes the queue
			let retry_sender = job_sender.downgrade();

			workers.push(tokio::spawn(async move {
				Self::worker_loop(worker_id, handler, job_receiver, active_job_ids, retry_sender)
					.await;
			}));
		}

		info!("Started job processor with {} workers", workers.len());

		Self {
			sender: RwLock::new(Some(job_sender)),
			workers: Mutex::new(workers),
			active_job_ids,
		}
	}

	/// Submit a job for background processing with retry policy and optional job ID
	pub async fn submit(
		&self,
		job: BackgroundJob,
		job_id: Option<String>,
		retry_policy: Option<RetryPolicy>,
	) -> JobResult<()> {
		debug!(
			"Submitting job: {} (ID: {:?}, retries: {:?})",
			job.description(),
			job_id,
			retry_policy
		);

		let sender = match self.sender.read().await.as_ref() {
			Some(sender) => sender.clone(),
			None => return Err(JobError::ShuttingDown),
		};

		// Reserve the id before queueing so concurrent submissions collapse
		if let Some(ref id) = job_id {
			let mut active_jobs = self.active_job_ids.write().await;
			if !active_jobs.insert(id.clone()) {
				return Err(JobError::Duplicate { id: id.clone() });
			}
		}

		let description = job.description();
		let request = JobRequest {
			job,
			job_id: job_id.clone(),
			retry_policy,
			attempt: 0,
		};

		match sender.try_send(request) {
			Ok(()) => {
				debug!("Job submitted successfully: {}", description);
				Ok(())
			},
			Err(e) => {
				warn!("Failed to submit job: {} - {}", description, e);
				if let Some(ref id) = job_id {
					self.active_job_ids.write().await.remove(id);
				}
				match e {
					mpsc::error::TrySendError::Full(_) => Err(JobError::QueueFull),
					mpsc::error::TrySendError::Closed(_) => Err(JobError::ShuttingDown),
				}
			},
		}
	}

	/// Whether a job with the given id is queued, running or awaiting a retry
	pub async fn is_active(&self, job_id: &str) -> bool {
		self.active_job_ids.read().await.contains(job_id)
	}

	/// Number of deduplicated jobs currently in flight
	pub async fn active_count(&self) -> usize {
		self.active_job_ids.read().await.len()
	}

	/// Stop accepting jobs, drain the queue and wait for the workers
	pub async fn shutdown(&self) -> JobResult {
		info!("Shutting down job processor...");

		// Dropping the only strong sender closes the queue once drained
		drop(self.sender.write().await.take());

		let workers: Vec<JoinHandle<()>> = self.workers.lock().await.drain(..).collect();
		for (i, worker) in workers.into_iter().enumerate() {
			if let Err(e) = worker.await {
				error!("Worker {} failed to shutdown cleanly: {}", i, e);
			} else {
				debug!("Worker {} shutdown cleanly", i);
			}
		}

		self.active_job_ids.write().await.clear();
		info!("Job processor shutdown complete");
		Ok(())
	}

	/// Worker loop that processes jobs
	async fn worker_loop(
		worker_id: usize,
		handler: Arc<dyn JobHandler>,
		job_receiver: Arc<Mutex<mpsc::Receiver<JobRequest>>>,
		active_job_ids: Arc<RwLock<HashSet<String>>>,
		retry_sender: mpsc::WeakSender<JobRequest>,
	) {
		debug!("Worker {} started", worker_id);

		loop {
			let next = job_receiver.lock().await.recv().await;
			let Some(request) = next else {
				break;
			};

			debug!(
				"Worker {} processing job: {} (ID: {:?}, attempt: {})",
				worker_id,
				request.job.description(),
				request.job_id,
				request.attempt
			);

			let start_time = std::time::Instant::now();

			// Use panic protection to prevent one bad job from killing the worker
			let fut = handler.handle(request.job.clone());
			let result = match AssertUnwindSafe(fut).catch_unwind().await {
				Ok(result) => result,
				Err(_) => {
					error!("Job handler panicked for job: {}", request.job.description());
					Err(JobError::ProcessingFailed {
						message: "Job handler panicked".to_string(),
					})
				},
			};

			let mut release_id = true;
			match result {
				Ok(()) => {
					debug!(
						"Worker {} completed job: {} (took {:?})",
						worker_id,
						request.job.description(),
						start_time.elapsed()
					);
				},
				Err(e) => {
					error!(
						"Worker {} failed to process job: {} - {} (attempt {})",
						worker_id,
						request.job.description(),
						e,
						request.attempt + 1
					);

					if let Some(policy) = request
						.retry_policy
						.as_ref()
						.filter(|p| request.attempt < p.max_retries)
					{
						let delay = policy.delay_for(request.attempt);
						info!(
							"Worker {} scheduling retry for job: {} (attempt {}/{}) in {:?}",
							worker_id,
							request.job.description(),
							request.attempt + 2,
							policy.max_retries + 1,
							delay
						);

						release_id = false;
						let retry = JobRequest {
							attempt: request.attempt + 1,
							..request.clone()
						};
						let retry_sender = retry_sender.clone();
						let active_job_ids = Arc::clone(&active_job_ids);

						tokio::spawn(async move {
							sleep(delay).await;
							let queued = match retry_sender.upgrade() {
								Some(sender) => sender.send(retry.clone()).await.is_ok(),
								None => false,
							};
							if !queued {
								warn!("Dropping retry for job: {}", retry.job.description());
								if let Some(ref id) = retry.job_id {
									active_job_ids.write().await.remove(id);
								}
							}
						});
					}
				},
			}

			if release_id {
				if let Some(ref id) = request.job_id {
					active_job_ids.write().await.remove(id);
					debug!("Worker {} removed job ID '{}' from active set", worker_id, id);
				}
			}
		}

		debug!("Worker {} stopped", worker_id);
	}
}
