//! Haulers Channel pricing formula
//!
//! A pure function of the contract shape. Collateral below 1b is inflated
//! toward a per-hull floor, short routes are billed as longer ones, and
//! routes leaving highsec fall back to a flat jump-freighter tariff.

use thiserror::Error;

/// Inputs to the pricing formula
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingInput {
	pub volume: f64,
	pub jumps: f64,
	pub collateral: f64,
	pub rush: bool,
	/// True when every system on the path is highsec
	pub highsec_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PricingRejection {
	#[error("Missing parameter.")]
	MissingParameter,
	/// Too large for a jump freighter on a route leaving highsec
	#[error("Does not fit")]
	DoesNotFit,
}

/// Additive surcharge for very large cargo, stepped by collateral
fn large_cargo_surcharge(volume: f64, collateral: f64) -> f64 {
	if volume > 1_050e3 {
		return 250e3 + if collateral > 2e9 { 200e3 } else { 0.0 };
	}

	let steps: &[(f64, f64)] = if volume > 880e3 {
		&[(1.5e9, 100e3), (2.5e9, 100e3), (3e9, 200e3)]
	} else if volume > 750e3 {
		&[(2.5e9, 100e3), (3e9, 200e3)]
	} else if volume > 500e3 {
		&[(2e9, 100e3), (3.5e9, 100e3)]
	} else {
		&[]
	};

	steps
		.iter()
		.filter(|(threshold, _)| collateral > *threshold)
		.map(|(_, amount)| amount)
		.sum()
}

/// Flat tariff multiplier by hull class for jump freighter routes
fn jump_freighter_multiplier(volume: f64) -> f64 {
	if volume < 100.0 {
		0.25
	} else if volume <= 12e3 {
		0.5
	} else if volume <= 60e3 {
		0.75
	} else if volume <= 340e3 {
		1.0
	} else {
		4.0
	}
}

/// Reward for one contract, or why it cannot be priced
pub fn haulers_channel_reward(input: PricingInput) -> Result<f64, PricingRejection> {
	let PricingInput {
		volume,
		mut jumps,
		mut collateral,
		rush,
		highsec_only,
	} = input;

	if volume == 0.0 || jumps == 0.0 || collateral == 0.0 {
		return Err(PricingRejection::MissingParameter);
	}

	let base = 1e6;
	let mut multiplier = 1.0;

	// Low collateral still pays for the hull it needs
	if volume > 62_500.0 && collateral < 1e9 {
		collateral = (3e9 + collateral) / 4.0;
	}
	if volume <= 60_000.0 && volume > 12_000.0 && collateral < 1e9 {
		collateral = (1e9 + collateral) / 2.0;
	}
	if volume <= 12_000.0 && collateral < 1e9 {
		collateral = (100e6 + collateral) / 1.1;
	}

	// Same system counts as one jump; short hops pay more per jump
	if jumps < 1.0 {
		jumps = 1.0;
	}
	if jumps < 5.0 {
		jumps = (5.0 + jumps) * 0.5;
	}

	if collateral > 3e9 && volume > 60e3 {
		multiplier *= f64::max(1.0, (collateral / 15e7).ln() / 15f64.ln());
	}

	let add = large_cargo_surcharge(volume, collateral);

	if rush {
		if collateral > 2e9 {
			multiplier *= 2.0 * f64::max(1.0, (collateral / 1e8).ln() / 20f64.ln());
		} else {
			multiplier *= 2.0;
		}
		if !highsec_only {
			multiplier *= 2.0;
		}
	}
	if !highsec_only {
		multiplier *= 2.0;
	}

	if highsec_only || volume <= 62_500.0 {
		Ok(((multiplier * base * collateral / 1e9) + add) * jumps)
	} else if volume > 386e3 {
		Err(PricingRejection::DoesNotFit)
	} else {
		let base = 60e6;
		let mut multiplier = jump_freighter_multiplier(volume);
		if rush {
			multiplier *= 2.0;
		}
		Ok(multiplier * base * f64::max(1.0, jumps / 7.0) + collateral * 0.01)
	}
}
