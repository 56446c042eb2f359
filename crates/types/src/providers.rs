//! Provider identities and display details

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a quote provider as accepted by the `providers` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
	RedFrog,
	PurpleFrog,
	BlackFrog,
	PushX,
	Ghsol,
	HaulersChannel,
}

impl ProviderId {
	/// Providers queried when the request does not name any
	pub const DEFAULTS: [ProviderId; 5] = [
		ProviderId::RedFrog,
		ProviderId::PurpleFrog,
		ProviderId::BlackFrog,
		ProviderId::Ghsol,
		ProviderId::PushX,
	];

	/// Identifier used in query strings and configuration
	pub fn as_str(&self) -> &'static str {
		match self {
			ProviderId::RedFrog => "redfrog",
			ProviderId::PurpleFrog => "purplefrog",
			ProviderId::BlackFrog => "blackfrog",
			ProviderId::PushX => "pushx",
			ProviderId::Ghsol => "ghsol",
			ProviderId::HaulersChannel => "haulerschannel",
		}
	}

	/// Segment used in cache keys owned by this provider
	pub fn cache_name(&self) -> &'static str {
		match self {
			ProviderId::PushX => "push",
			other => other.as_str(),
		}
	}

	/// Human-facing name and link for result entries
	pub fn details(&self) -> ProviderDetails {
		let (name, url) = match self {
			ProviderId::RedFrog => ("Red Frog Freight", "https://red-frog.org/"),
			ProviderId::PurpleFrog => (
				"Purple Frog Transport",
				"https://red-frog.org/purple_calculator",
			),
			ProviderId::BlackFrog => (
				"Black Frog Logistics",
				"https://red-frog.org/black_calculator",
			),
			ProviderId::PushX => ("Push Industries", "https://www.pushx.net/"),
			ProviderId::Ghsol => (
				"Galactic Hauling Solutions Inc.",
				"https://forums.eveonline.com/t/service-ghsol-a-simple-flat-rate-low-sec-jf-courier-service-moving-your-cargo-for-the-last-6-years",
			),
			ProviderId::HaulersChannel => (
				"Haulers Channel",
				"https://forums.eveonline.com/t/haulers-channel",
			),
		};
		ProviderDetails {
			provider: name.to_string(),
			url: Some(url.to_string()),
		}
	}

	/// Parse a comma separated provider list, silently dropping unknown names
	pub fn parse_list(raw: &str) -> Vec<ProviderId> {
		let mut ids = Vec::new();
		for id in raw.split(',').filter_map(|p| p.trim().parse::<ProviderId>().ok()) {
			if !ids.contains(&id) {
				ids.push(id);
			}
		}
		ids
	}
}

impl fmt::Display for ProviderId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ProviderId {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"redfrog" => Ok(ProviderId::RedFrog),
			"purplefrog" => Ok(ProviderId::PurpleFrog),
			"blackfrog" => Ok(ProviderId::BlackFrog),
			"pushx" => Ok(ProviderId::PushX),
			"ghsol" => Ok(ProviderId::Ghsol),
			"haulerschannel" => Ok(ProviderId::HaulersChannel),
			other => Err(format!("Unknown provider: {}", other)),
		}
	}
}

/// Display name and link attached to every result entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDetails {
	pub provider: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
}
