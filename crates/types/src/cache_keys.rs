//! Cache key schema, input bucketing and TTL windows
//!
//! Route quotes are keyed on coarse volume/collateral tiers rather than raw
//! values so that near-identical requests share one upstream answer.

use rand::Rng;
use std::time::Duration;

use crate::constants::limits::{DAY, HALF_DAY};
use crate::distance::DistanceMetric;
use crate::providers::ProviderId;
use crate::routes::RouteParameters;

/// Prefix for route quote entries
pub const ROUTES_PREFIX: &str = "routes";
/// Prefix for rate limiter markers
pub const RATE_MARKER_PREFIX: &str = "apirate";
/// Prefix for per-system metadata
pub const SYSTEM_INFO_PREFIX: &str = "systemInfo";
/// Prefix for resolved distance records
pub const DISTANCE_PREFIX: &str = "distance";
/// Prefix for persisted route responses
pub const RESULTS_PREFIX: &str = "results";
/// Prefix for mainland probe outcomes
pub const MAINLAND_PREFIX: &str = "mainland";

/// Ceiling division of `value` by `unit`, rendered with `suffix`
fn ceil_tier(value: f64, unit: f64, suffix: &str) -> String {
	format!("{}{}", (value / unit).ceil(), suffix)
}

/// Bucket a volume in m³: raw below 1k, ceiled thousands below 1m, ceiled millions above
pub fn volume_bucket(volume: f64) -> String {
	if volume < 1_000.0 {
		format!("{}", volume)
	} else if volume < 1_000_000.0 {
		ceil_tier(volume, 1_000.0, "k")
	} else {
		ceil_tier(volume, 1_000_000.0, "m")
	}
}

/// Bucket a collateral value: raw below 1m, ceiled millions below 1b, ceiled billions above
pub fn collateral_bucket(collateral: f64) -> String {
	if collateral < 1_000_000.0 {
		format!("{}", collateral)
	} else if collateral < 1_000_000_000.0 {
		ceil_tier(collateral, 1_000_000.0, "m")
	} else {
		ceil_tier(collateral, 1_000_000_000.0, "b")
	}
}

/// Cache key of a provider's quote for the bucketed route parameters
pub fn route_key(provider: ProviderId, params: &RouteParameters) -> String {
	format!(
		"{}:{}:{}:{}:{}:{}",
		ROUTES_PREFIX,
		provider.cache_name(),
		params.origin,
		params.destination,
		volume_bucket(params.volume),
		collateral_bucket(params.collateral)
	)
}

/// Prefix shared by every rate marker of one limiter
pub fn rate_marker_prefix(name: &str) -> String {
	format!("{}:{}:", RATE_MARKER_PREFIX, name)
}

/// Key of a single rate marker tagged with the one-second bucket it was created in
pub fn rate_marker_key(name: &str, now_ms: i64, unique: &str) -> String {
	let second_bucket = (now_ms as f64 / 1_000.0).ceil() as i64;
	format!("{}{}:{}", rate_marker_prefix(name), second_bucket, unique)
}

pub fn system_info_key(system_id: i64) -> String {
	format!("{}:{}", SYSTEM_INFO_PREFIX, system_id)
}

/// Prefix matching every distance record of an origin/destination pair
pub fn distance_prefix(origin: &str, destination: &str) -> String {
	format!("{}:{}:{}:", DISTANCE_PREFIX, origin, destination)
}

pub fn distance_key(origin: &str, destination: &str, metric: DistanceMetric) -> String {
	format!("{}{}", distance_prefix(origin, destination), metric.as_str())
}

pub fn distance_job_key(origin: &str, destination: &str, metric: DistanceMetric) -> String {
	format!("distance_job_{}:{}:{}", metric.as_str(), origin, destination)
}

pub fn results_key(epoch_ms: i64) -> String {
	format!("{}:{}", RESULTS_PREFIX, epoch_ms)
}

pub fn mainland_key(system_name: &str) -> String {
	format!("{}:{}", MAINLAND_PREFIX, system_name.to_lowercase())
}

/// Randomized expiry window `base + rand(0..spread)` seconds
///
/// Spreading expiries keeps routes refreshed in the same upstream cycle from
/// all expiring at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlWindow {
	pub base_secs: u64,
	pub spread_secs: u64,
}

impl TtlWindow {
	pub const fn new(base_secs: u64, spread_secs: u64) -> Self {
		Self {
			base_secs,
			spread_secs,
		}
	}

	/// Half a day plus up to another half day
	pub const fn half_day() -> Self {
		Self::new(HALF_DAY, HALF_DAY)
	}

	/// One day plus up to a week
	pub const fn week() -> Self {
		Self::new(DAY, 7 * DAY)
	}

	/// Thirty days plus up to thirty more, for rejections that rarely change
	pub const fn rejection() -> Self {
		Self::new(30 * DAY, 30 * DAY)
	}

	/// Draw a concrete TTL from the window
	pub fn sample(&self) -> Duration {
		let jitter = if self.spread_secs == 0 {
			0
		} else {
			rand::thread_rng().gen_range(0..self.spread_secs)
		};
		Duration::from_secs(self.base_secs + jitter)
	}
}
