//! Static catalog of solar system names for client-side autocompletion

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CatalogError {
	#[error("Failed to read system names from {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},
	#[error("System names file {path} is not a JSON array of strings: {source}")]
	Format {
		path: String,
		#[source]
		source: serde_json::Error,
	},
}

/// Body of `/api/systems`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemsResponse {
	pub system_names: Vec<String>,
	pub version: String,
}

/// Versioned name list; clients holding the current version get an empty list
#[derive(Debug, Clone, Default)]
pub struct SystemsCatalog {
	names: Vec<String>,
	version: String,
}

impl SystemsCatalog {
	pub fn new(names: Vec<String>, version: impl Into<String>) -> Self {
		Self {
			names,
			version: version.into(),
		}
	}

	/// Load names from an optional JSON file; no path means an empty catalog
	pub fn load(path: Option<&Path>, version: impl Into<String>) -> Result<Self, CatalogError> {
		let Some(path) = path else {
			return Ok(Self::new(Vec::new(), version));
		};

		let path_label = path.display().to_string();
		let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
			path: path_label.clone(),
			source,
		})?;
		let names: Vec<String> = serde_json::from_str(&raw).map_err(|source| CatalogError::Format {
			path: path_label.clone(),
			source,
		})?;

		info!("Loaded {} system names from {}", names.len(), path_label);
		Ok(Self::new(names, version))
	}

	pub fn version(&self) -> &str {
		&self.version
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}

	pub fn response_for(&self, client_version: Option<&str>) -> SystemsResponse {
		let system_names = if client_version == Some(self.version.as_str()) {
			Vec::new()
		} else {
			self.names.clone()
		};
		SystemsResponse {
			system_names,
			version: self.version.clone(),
		}
	}
}
