//! Configuration loading utilities

use crate::settings::{ConfigValidationError, Settings};
use config::{Config, ConfigError, Environment, File};
use thiserror::Error;

/// Environment prefix; `HAUL__SERVER__PORT=8080` overrides `server.port`
pub const ENV_PREFIX: &str = "HAUL";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
	#[error("Failed to load configuration: {0}")]
	Config(#[from] ConfigError),
	#[error("Invalid configuration: {0}")]
	Validation(#[from] ConfigValidationError),
}

/// Load settings from `config/config.{toml,json}` and `HAUL__*` variables
///
/// A `.env` file in the working directory is read first when present.
pub fn load_config() -> Result<Settings, ConfigLoadError> {
	let _ = dotenvy::dotenv();
	load_config_from("config/config")
}

/// Load settings with an explicit base path for the optional config file
pub fn load_config_from(path: &str) -> Result<Settings, ConfigLoadError> {
	let settings: Settings = Config::builder()
		.add_source(File::with_name(path).required(false))
		.add_source(
			Environment::with_prefix(ENV_PREFIX)
				.separator("__")
				.list_separator(",")
				.with_list_parse_key("providers.default")
				.try_parsing(true),
		)
		.build()?
		.try_deserialize()?;

	settings.validate()?;
	Ok(settings)
}
