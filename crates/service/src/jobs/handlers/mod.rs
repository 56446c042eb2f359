//! Job handler implementations organized by functionality

use async_trait::async_trait;
use haul_adapters::{FrogApi, SystemDirectory};
use haul_types::{CacheStore, DistanceMetric};
use std::sync::Arc;

use super::generic_handler::{GenericJobHandler, RouteEndpoints};
use super::processor::JobHandler;
use super::types::{BackgroundJob, JobResult};

pub mod gates;
pub mod lightyears;

pub use gates::GatesDistanceHandler;
pub use lightyears::LightyearsDistanceHandler;

/// Handler for background jobs, dispatching on the job kind
pub struct BackgroundJobHandler {
	gates_handler: GatesDistanceHandler,
	lightyears_handler: LightyearsDistanceHandler,
}

impl BackgroundJobHandler {
	pub fn new(
		store: Arc<dyn CacheStore>,
		directory: SystemDirectory,
		frog: Arc<dyn FrogApi>,
	) -> Self {
		Self {
			gates_handler: GatesDistanceHandler::new(Arc::clone(&store), directory),
			lightyears_handler: LightyearsDistanceHandler::new(store, frog),
		}
	}
}

#[async_trait]
impl JobHandler for BackgroundJobHandler {
	async fn handle(&self, job: BackgroundJob) -> JobResult {
		match job {
			BackgroundJob::ResolveDistance(job) => {
				let endpoints = RouteEndpoints::new(job.origin, job.destination);
				match job.metric {
					DistanceMetric::Gates => self.gates_handler.handle(endpoints).await,
					DistanceMetric::Lightyears => self.lightyears_handler.handle(endpoints).await,
				}
			},
		}
	}
}
