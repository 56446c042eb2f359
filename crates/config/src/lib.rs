//! Haul Configuration
//!
//! Configuration management and startup utilities for the hauling quote aggregator.

pub mod configurable_value;
pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use configurable_value::{ConfigurableValue, ConfigurableValueError, ValueType};
pub use loader::{load_config, load_config_from, ConfigLoadError};
pub use settings::{
	CacheBackend, CacheSettings, ConfigValidationError, JobSettings, LogFormat, LoggingSettings,
	ProviderSettings, RateLimitSettings, ServerSettings, Settings, SystemsSettings,
	UpstreamSettings,
};
pub use startup_logger::{
	log_service_info, log_service_shutdown, log_settings, log_startup_complete,
};
