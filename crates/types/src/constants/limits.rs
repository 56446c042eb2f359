//! Global limits and defaults for configuration and runtime

/// One day in seconds
pub const DAY: u64 = 24 * 60 * 60;

/// Half a day in seconds
pub const HALF_DAY: u64 = 12 * 60 * 60;

/// Default number of upstream calls admitted per rate window
pub const DEFAULT_RATE_LIMIT: usize = 90;

/// Default rate window duration in seconds
pub const DEFAULT_RATE_WINDOW_SECONDS: u64 = 600;

/// Default lifetime of a distance job record in seconds
pub const DEFAULT_JOB_RECORD_TTL_SECONDS: u64 = 600;

/// Default lifetime of stored response history in seconds
pub const DEFAULT_HISTORY_TTL_SECONDS: u64 = 7 * DAY;

/// Nominal collateral used when probing the black calculator purely for distance
pub const LIGHTYEAR_PROBE_COLLATERAL: f64 = 100_000_000.0;

/// Security status at or above which a system counts as highsec
pub const HIGHSEC_THRESHOLD: f64 = 0.45;

/// Destination used when probing whether a system is connected to mainland highsec
pub const MAINLAND_PROBE_DESTINATION: &str = "Jita";
