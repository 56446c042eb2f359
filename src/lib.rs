//! Haul Aggregator Library
//!
//! Aggregates freight quotes for EVE Online courier contracts from several
//! independent hauling providers, caching upstream answers and resolving route
//! distances in the background.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

// Core domain types
pub use haul_types::{
	chrono,
	serde_json,
	AdapterError,
	CacheStore,
	CacheStoreExt,
	DistanceMetric,
	Distances,
	ErrorKind,
	ProviderDetails,
	// Primary domain entities
	ProviderId,
	QuoteFailure,
	QuoteOffer,
	QuoteProvider,
	QuoteResult,
	RouteParameters,
	RouteQuery,
	RouteResponse,
	StorageError,
	StorageResult,
	ValidationError,
};

// Service layer
pub use haul_service::{
	AggregatorConfig, AggregatorService, AggregatorTrait, DistanceService, JobProcessor,
	MainlandService, MainlandTrait, SystemsCatalog,
};

// Storage layer
pub use haul_storage::MemoryStore;
#[cfg(feature = "redis")]
pub use haul_storage::RedisStore;

// API layer
pub use haul_api::{create_router, AppState};

// Adapters
pub use haul_adapters::{ProviderRegistry, SystemDirectory};

// Config
pub use haul_config::{load_config, log_service_info, log_startup_complete, Settings};

// Module aliases for callers that prefer paths over the flat re-exports
pub mod types {
	pub use haul_types::*;
}

pub mod storage {
	pub use haul_storage::*;
}

pub mod config {
	pub use haul_config::*;
}

pub mod adapters {
	pub use haul_adapters::*;
}

pub mod api {
	pub use haul_api::*;
}

pub mod service {
	pub use haul_service::*;
}

use haul_adapters::{
	ClientCache, EsiClient, FrogApi, FrogClient, ProviderDeps, PushxApi, PushxClient,
	RateLimitSettings, TopologyApi,
};
use haul_config::{log_service_shutdown, log_settings, CacheBackend, LogFormat};
use haul_service::{BackgroundJobHandler, JobProcessorConfig, RetryPolicy};
use haul_types::DistanceJobSink;

/// A started aggregator: the router to serve plus the handles needed to stop it
pub struct AggregatorHandle {
	pub router: axum::Router,
	pub state: AppState,
	pub jobs: Arc<JobProcessor>,
}

impl AggregatorHandle {
	/// Stop accepting distance jobs and wait for in-flight ones to finish
	pub async fn shutdown(&self) {
		info!(
			"Draining {} in-flight distance jobs",
			self.jobs.active_count().await
		);
		if let Err(e) = self.jobs.shutdown().await {
			warn!("Distance job processor did not shut down cleanly: {}", e);
		}
	}
}

/// Builder pattern for configuring the aggregator
#[derive(Default)]
pub struct AggregatorBuilder {
	settings: Option<Settings>,
	store: Option<Arc<dyn CacheStore>>,
	frog: Option<Arc<dyn FrogApi>>,
	pushx: Option<Arc<dyn PushxApi>>,
	topology: Option<Arc<dyn TopologyApi>>,
}

impl AggregatorBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set custom settings
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Use an already constructed cache store instead of the configured backend
	pub fn with_store(mut self, store: Arc<dyn CacheStore>) -> Self {
		self.store = Some(store);
		self
	}

	/// Replace the Red Frog calculator client
	pub fn with_frog_api(mut self, frog: Arc<dyn FrogApi>) -> Self {
		self.frog = Some(frog);
		self
	}

	/// Replace the PushX quote client
	pub fn with_pushx_api(mut self, pushx: Arc<dyn PushxApi>) -> Self {
		self.pushx = Some(pushx);
		self
	}

	/// Replace the ESI topology client
	pub fn with_topology_api(mut self, topology: Arc<dyn TopologyApi>) -> Self {
		self.topology = Some(topology);
		self
	}

	/// Get the current settings
	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	async fn build_store(
		settings: &Settings,
	) -> Result<Arc<dyn CacheStore>, Box<dyn std::error::Error>> {
		match settings.cache.backend {
			CacheBackend::Memory => Ok(Arc::new(MemoryStore::with_cleanup_interval(
				settings.cache.cleanup_interval(),
			))),
			#[cfg(feature = "redis")]
			CacheBackend::Redis => {
				let url = settings.redis_url()?;
				Ok(Arc::new(RedisStore::connect(&url).await?))
			},
			#[cfg(not(feature = "redis"))]
			CacheBackend::Redis => {
				Err("cache.backend is 'redis' but the binary was built without the redis feature".into())
			},
		}
	}

	/// Wire every component and return the configured router with its state
	pub async fn start(self) -> Result<AggregatorHandle, Box<dyn std::error::Error>> {
		let settings = self.settings.unwrap_or_default();
		settings.validate()?;

		let store = match self.store {
			Some(store) => store,
			None => Self::build_store(&settings).await?,
		};
		store.start_background_tasks().await?;

		let upstreams = &settings.upstreams;
		let timeout_ms = upstreams.request_timeout_ms;
		let client_cache = ClientCache::new();

		let frog: Arc<dyn FrogApi> = match self.frog {
			Some(frog) => frog,
			None => Arc::new(FrogClient::new(
				&upstreams.red_frog_base_url,
				timeout_ms,
				client_cache.clone(),
			)),
		};
		let pushx: Arc<dyn PushxApi> = match self.pushx {
			Some(pushx) => pushx,
			None => Arc::new(PushxClient::new(
				&upstreams.pushx_base_url,
				&settings.pushx_api_client()?,
				timeout_ms,
				client_cache.clone(),
			)),
		};
		let topology: Arc<dyn TopologyApi> = match self.topology {
			Some(topology) => topology,
			None => Arc::new(EsiClient::new(
				&upstreams.esi_base_url,
				timeout_ms,
				client_cache,
			)),
		};
		let directory = SystemDirectory::new(topology, Arc::clone(&store));

		let job_handler = BackgroundJobHandler::new(
			Arc::clone(&store),
			directory.clone(),
			Arc::clone(&frog),
		);
		let jobs = Arc::new(JobProcessor::new(
			Arc::new(job_handler),
			JobProcessorConfig {
				queue_capacity: settings.jobs.queue_capacity,
				worker_count: settings.jobs.worker_count,
			},
		));
		let retry_policy = RetryPolicy {
			max_retries: settings.jobs.max_retries,
			retry_delay_seconds: settings.jobs.retry_delay_seconds,
			..RetryPolicy::default()
		};
		let distance_jobs: Arc<dyn DistanceJobSink> = Arc::new(DistanceService::new(
			Arc::clone(&store),
			Arc::clone(&jobs),
			settings.jobs.job_record_ttl(),
			Some(retry_policy),
		));

		let registry = Arc::new(ProviderRegistry::standard(ProviderDeps {
			store: Arc::clone(&store),
			frog: Arc::clone(&frog),
			pushx,
			directory: directory.clone(),
			distance_jobs: Arc::clone(&distance_jobs),
			pushx_rate_limit: RateLimitSettings {
				limit: settings.rate_limit.pushx_limit,
				window: settings.rate_limit.window(),
			},
		}));
		info!(
			"Registered {} quote providers: {:?}",
			registry.len(),
			registry.ids()
		);

		let aggregator = AggregatorService::new(
			registry,
			Arc::clone(&store),
			distance_jobs,
			AggregatorConfig {
				default_providers: settings.default_providers()?,
				history_ttl: settings.cache.history_ttl(),
			},
		);
		let mainland = MainlandService::new(Arc::clone(&store), frog, directory);
		let systems = SystemsCatalog::load(
			settings.systems.names_path.as_deref(),
			settings.systems.version.clone(),
		)?;
		info!(
			"Loaded {} system names (version {})",
			systems.len(),
			systems.version()
		);

		let state = AppState {
			aggregator: Arc::new(aggregator) as Arc<dyn AggregatorTrait>,
			mainland: Arc::new(mainland) as Arc<dyn MainlandTrait>,
			systems: Arc::new(systems),
			store,
		};
		let router = create_router().with_state(state.clone());

		Ok(AggregatorHandle {
			router,
			state,
			jobs,
		})
	}

	/// Start the complete server with all defaults and setup
	/// This method handles everything needed to run the server, including:
	/// - Loading .env file and configuration
	/// - Initializing tracing
	/// - Binding and serving the application until Ctrl-C
	pub async fn start_server(mut self) -> Result<(), Box<dyn std::error::Error>> {
		let using_provided_settings = self.settings.is_some();
		let settings = match self.settings.take() {
			Some(settings) => settings,
			None => load_config()?,
		};

		init_tracing_from_settings(&settings)?;
		log_service_info();
		info!(
			"Using configuration: loaded from {}",
			if using_provided_settings {
				"provided settings"
			} else {
				"config file, environment or defaults"
			}
		);
		log_settings(&settings);

		let bind_addr = settings.bind_address();
		let addr: SocketAddr = bind_addr
			.parse()
			.map_err(|e| format!("Invalid bind address '{}': {}", bind_addr, e))?;

		self.settings = Some(settings);
		let handle = self.start().await?;

		let listener = tokio::net::TcpListener::bind(addr).await?;
		log_startup_complete(&bind_addr);
		info!("API endpoints available:");
		info!("  GET  /health");
		info!("  GET  /api/route");
		info!("  GET  /api/mainland");
		info!("  GET  /api/systems");

		axum::serve(listener, handle.router.clone())
			.with_graceful_shutdown(shutdown_signal())
			.await?;

		handle.shutdown().await;
		log_service_shutdown();
		Ok(())
	}
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		warn!("Failed to listen for shutdown signal: {}", e);
		// Without a signal handler the server runs until killed
		std::future::pending::<()>().await;
	}
	info!("Shutdown signal received");
}

/// Initialize tracing with configuration-based settings
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing_from_settings(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
	let log_level = &settings.logging.level;
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
	let structured = settings.logging.structured;

	match settings.logging.format {
		LogFormat::Json => {
			tracing_subscriber::fmt()
				.json()
				.with_env_filter(env_filter)
				.with_target(structured)
				.with_thread_ids(structured)
				.try_init()
				.map_err(|e| format!("Failed to initialise tracing: {}", e))?;
		},
		LogFormat::Pretty => {
			tracing_subscriber::fmt()
				.pretty()
				.with_env_filter(env_filter)
				.with_target(structured)
				.with_thread_ids(structured)
				.try_init()
				.map_err(|e| format!("Failed to initialise tracing: {}", e))?;
		},
		LogFormat::Compact => {
			tracing_subscriber::fmt()
				.compact()
				.with_env_filter(env_filter)
				.with_target(structured)
				.with_thread_ids(structured)
				.try_init()
				.map_err(|e| format!("Failed to initialise tracing: {}", e))?;
		},
	}

	info!(
		"Logging configuration applied: level={}, format={:?}, structured={}",
		settings.logging.level, settings.logging.format, settings.logging.structured
	);

	Ok(())
}
