//! Service startup logging

use crate::settings::Settings;
use std::env;
use tracing::info;

/// Logs service information at startup
pub fn log_service_info() {
	let service_name = "haul-aggregator";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== Haul Aggregator Service Starting ===");
	info!("🚀 Service: {} v{}", service_name, service_version);
	info!("💻 Platform: {} ({})", env::consts::OS, env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("📁 Working Directory: {}", cwd.display());
	}

	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("🔧 Log Level: {}", rust_log);
	}

	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs the effective configuration without exposing credentials
pub fn log_settings(settings: &Settings) {
	info!("🧭 Cache backend: {:?}", settings.cache.backend);
	info!("🐸 Red Frog: {}", settings.upstreams.red_frog_base_url);
	info!("📦 PushX: {}", settings.upstreams.pushx_base_url);
	info!(
		"🔑 PushX client id from {}",
		settings.upstreams.pushx_api_client.description()
	);
	info!("🌌 ESI: {}", settings.upstreams.esi_base_url);
	info!(
		"⏱️ PushX rate limit: {} calls per {}s",
		settings.rate_limit.pushx_limit, settings.rate_limit.window_seconds
	);
	info!(
		"⚙️ Distance jobs: {} workers, queue {}",
		settings.jobs.worker_count, settings.jobs.queue_capacity
	);
	info!("📋 Default providers: {}", settings.providers.default.join(","));
}

/// Logs service shutdown information
pub fn log_service_shutdown() {
	info!("🛑 Haul Aggregator Service Shutting Down");
	info!(
		"🕒 Shutdown at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs additional startup completion information
pub fn log_startup_complete(bind_address: &str) {
	info!("✅ Haul Aggregator Service Started Successfully");
	info!("🌐 Server listening on: {}", bind_address);
	info!("📡 Ready to accept requests");
}
