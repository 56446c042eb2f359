//! Configuration settings structures

use crate::configurable_value::{ConfigurableValue, ConfigurableValueError};
use haul_types::constants::limits::{
	DEFAULT_HISTORY_TTL_SECONDS, DEFAULT_JOB_RECORD_TTL_SECONDS, DEFAULT_RATE_LIMIT,
	DEFAULT_RATE_WINDOW_SECONDS,
};
use haul_types::ProviderId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Main application settings
///
/// Every section has defaults so the service boots without a config file.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
	pub server: ServerSettings,
	pub upstreams: UpstreamSettings,
	pub rate_limit: RateLimitSettings,
	pub cache: CacheSettings,
	pub jobs: JobSettings,
	pub providers: ProviderSettings,
	pub systems: SystemsSettings,
	pub logging: LoggingSettings,
}

/// Server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self {
			host: "0.0.0.0".to_string(),
			port: 3000,
		}
	}
}

/// Base URLs and client options for the upstream services
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UpstreamSettings {
	pub red_frog_base_url: String,
	pub pushx_base_url: String,
	pub esi_base_url: String,
	/// Client id sent to PushX with every quote request
	pub pushx_api_client: ConfigurableValue,
	/// Optional per-request HTTP timeout; unset means wait for the upstream
	pub request_timeout_ms: Option<u64>,
}

impl Default for UpstreamSettings {
	fn default() -> Self {
		Self {
			red_frog_base_url: "https://red-frog.org/api/public/v1/calculator".to_string(),
			pushx_base_url: "https://api.pushx.net/api/quote/json".to_string(),
			esi_base_url: "https://esi.evetech.net/latest".to_string(),
			pushx_api_client: ConfigurableValue::from_plain("hauling-advisor"),
			request_timeout_ms: None,
		}
	}
}

/// PushX admission control
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RateLimitSettings {
	pub pushx_limit: usize,
	pub window_seconds: u64,
}

impl Default for RateLimitSettings {
	fn default() -> Self {
		Self {
			pushx_limit: DEFAULT_RATE_LIMIT,
			window_seconds: DEFAULT_RATE_WINDOW_SECONDS,
		}
	}
}

impl RateLimitSettings {
	pub fn window(&self) -> Duration {
		Duration::from_secs(self.window_seconds)
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
	Memory,
	Redis,
}

/// Cache backend configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CacheSettings {
	pub backend: CacheBackend,
	pub redis_url: ConfigurableValue,
	/// Sweep interval of the in-memory backend
	pub cleanup_interval_seconds: u64,
	pub history_ttl_seconds: u64,
}

impl Default for CacheSettings {
	fn default() -> Self {
		Self {
			backend: CacheBackend::Memory,
			redis_url: ConfigurableValue::from_plain("redis://127.0.0.1:6379"),
			cleanup_interval_seconds: 60,
			history_ttl_seconds: DEFAULT_HISTORY_TTL_SECONDS,
		}
	}
}

impl CacheSettings {
	pub fn cleanup_interval(&self) -> Duration {
		Duration::from_secs(self.cleanup_interval_seconds)
	}

	pub fn history_ttl(&self) -> Duration {
		Duration::from_secs(self.history_ttl_seconds)
	}
}

/// Background distance job configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct JobSettings {
	pub worker_count: usize,
	pub queue_capacity: usize,
	/// Lifetime of the dedup record written when a job is enqueued
	pub job_record_ttl_seconds: u64,
	pub max_retries: u32,
	pub retry_delay_seconds: u64,
}

impl Default for JobSettings {
	fn default() -> Self {
		Self {
			worker_count: 2,
			queue_capacity: 256,
			job_record_ttl_seconds: DEFAULT_JOB_RECORD_TTL_SECONDS,
			max_retries: 1,
			retry_delay_seconds: 2,
		}
	}
}

impl JobSettings {
	pub fn job_record_ttl(&self) -> Duration {
		Duration::from_secs(self.job_record_ttl_seconds)
	}
}

/// Provider selection
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ProviderSettings {
	/// Providers queried when a request names none
	pub default: Vec<String>,
}

impl Default for ProviderSettings {
	fn default() -> Self {
		Self {
			default: ProviderId::DEFAULTS
				.iter()
				.map(|id| id.as_str().to_string())
				.collect(),
		}
	}
}

/// Static system name catalog
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SystemsSettings {
	pub version: String,
	/// JSON array of system names; unset serves an empty catalog
	pub names_path: Option<PathBuf>,
}

impl Default for SystemsSettings {
	fn default() -> Self {
		Self {
			version: "20211018".to_string(),
			names_path: None,
		}
	}
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Pretty,
			structured: false,
		}
	}
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

/// Settings that parse but cannot be run with
#[derive(Debug, Error)]
pub enum ConfigValidationError {
	#[error("Unknown provider '{0}' in providers.default")]
	UnknownProvider(String),
	#[error("{field} must be greater than zero")]
	Zero { field: &'static str },
	#[error("Failed to resolve {field}: {source}")]
	Unresolved {
		field: &'static str,
		#[source]
		source: ConfigurableValueError,
	},
}

impl Settings {
	/// Get server bind address
	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.server.host, self.server.port)
	}

	/// Default provider ids, rejecting unknown names
	pub fn default_providers(&self) -> Result<Vec<ProviderId>, ConfigValidationError> {
		self.providers
			.default
			.iter()
			.map(|name| {
				ProviderId::from_str(name.trim())
					.map_err(|_| ConfigValidationError::UnknownProvider(name.clone()))
			})
			.collect()
	}

	pub fn pushx_api_client(&self) -> Result<String, ConfigValidationError> {
		self.upstreams
			.pushx_api_client
			.resolve()
			.map_err(|source| ConfigValidationError::Unresolved {
				field: "upstreams.pushx_api_client",
				source,
			})
	}

	pub fn redis_url(&self) -> Result<String, ConfigValidationError> {
		self.cache
			.redis_url
			.resolve()
			.map_err(|source| ConfigValidationError::Unresolved {
				field: "cache.redis_url",
				source,
			})
	}

	/// Check invariants the type system does not capture
	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		let positive = [
			("server.port", self.server.port as u64),
			("rate_limit.pushx_limit", self.rate_limit.pushx_limit as u64),
			("rate_limit.window_seconds", self.rate_limit.window_seconds),
			("jobs.worker_count", self.jobs.worker_count as u64),
			("jobs.queue_capacity", self.jobs.queue_capacity as u64),
			("jobs.job_record_ttl_seconds", self.jobs.job_record_ttl_seconds),
		];
		if let Some((field, _)) = positive.iter().find(|(_, value)| *value == 0) {
			return Err(ConfigValidationError::Zero { field: *field });
		}

		self.default_providers()?;
		self.pushx_api_client()?;
		if self.cache.backend == CacheBackend::Redis {
			self.redis_url()?;
		}
		Ok(())
	}
}
