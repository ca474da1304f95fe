// This file is part of Entropass.
//
// Copyright (c) 2025  René Coignard <contact@renecoignard.com>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Brute-force time estimates for a given amount of entropy.
//!
//! Search spaces are exact big integers. Durations are carried as base-10
//! logarithms so they stay finite for any entropy; a 4096-bit search space
//! is far outside `f64` range but its duration still formats correctly.

use crate::config::SearchRate;
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

/// Fixed 365-day year, no leap-year adjustment.
pub const SECONDS_PER_YEAR: f64 = 60.0 * 60.0 * 24.0 * 365.0;

/// Largest bit length whose value still converts to a finite `f64`.
const F64_SAFE_BITS: u64 = 1000;

/// A non-negative duration in years, stored as its base-10 logarithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Years {
    log10: f64,
}

impl Years {
    fn from_log10(log10: f64) -> Self {
        Self { log10 }
    }

    pub fn log10(&self) -> f64 {
        self.log10
    }

    /// The duration as a float; `f64::INFINITY` past the float range.
    pub fn as_f64(&self) -> f64 {
        10f64.powf(self.log10)
    }

    /// Decimal mantissa in `[1, 10)` and exponent.
    pub fn scientific(&self) -> (f64, i64) {
        let exponent = self.log10.floor();
        let mantissa = 10f64.powf(self.log10 - exponent);
        (mantissa, exponent as i64)
    }
}

impl PartialOrd for Years {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.log10.partial_cmp(&other.log10)
    }
}

impl fmt::Display for Years {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(2);
        let (mut mantissa, mut exponent) = self.scientific();

        let rounded: f64 = format!("{:.*}", precision, mantissa).parse().unwrap_or(mantissa);
        if rounded >= 10.0 {
            mantissa = rounded / 10.0;
            exponent += 1;
        }

        write!(f, "{:.*}e{}", precision, mantissa, exponent)
    }
}

/// Classical and quantum brute-force estimates for one entropy value.
#[derive(Debug, Clone, PartialEq)]
pub struct CrackEstimate {
    pub bits_entropy: u32,
    pub classical_search_space: BigUint,
    pub quantum_search_space: BigUint,
    pub classical_years: Years,
    pub quantum_years: Years,
    pub qubits_required: u32,
}

/// Estimates how long exhausting `2^bits_entropy` candidates takes at `rate`.
///
/// The quantum figure assumes a Grover-style quadratic speed-up: the search
/// space is the integer square root of the classical one.
pub fn estimate(bits_entropy: u32, rate: &SearchRate) -> CrackEstimate {
    let classical_search_space = BigUint::one() << bits_entropy;
    let quantum_search_space = classical_search_space.sqrt();

    let classical_years = years_to_search(&classical_search_space, rate);
    let quantum_years = years_to_search(&quantum_search_space, rate);
    let qubits_required = qubits_required(bits_entropy);

    debug!(
        bits_entropy,
        checks_per_second = rate.checks_per_second(),
        classical_years = %classical_years,
        quantum_years = %quantum_years,
        qubits_required,
        "estimated brute-force time"
    );

    CrackEstimate {
        bits_entropy,
        classical_search_space,
        quantum_search_space,
        classical_years,
        quantum_years,
        qubits_required,
    }
}

/// Rough heuristic: `ceil(log2(bits))` qubits. Zero for one bit or less.
pub fn qubits_required(bits_entropy: u32) -> u32 {
    if bits_entropy <= 1 {
        0
    } else {
        u32::BITS - (bits_entropy - 1).leading_zeros()
    }
}

fn years_to_search(search_space: &BigUint, rate: &SearchRate) -> Years {
    let seconds_log10 = big_log10(search_space) - rate.checks_per_second().log10();
    Years::from_log10(seconds_log10 - SECONDS_PER_YEAR.log10())
}

/// `log10(n)` for `n >= 1`, exact to `f64` precision for any bit length.
fn big_log10(n: &BigUint) -> f64 {
    let bits = n.bits();
    if bits <= F64_SAFE_BITS {
        return n.to_f64().unwrap_or(f64::INFINITY).log10();
    }

    let shift = bits - 64;
    let top = (n >> shift).to_f64().unwrap_or(f64::INFINITY);
    top.log10() + shift as f64 * std::f64::consts::LOG10_2
}
