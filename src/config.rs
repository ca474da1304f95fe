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

use crate::error::{PassphraseError, Result};
use crate::wordlist::Dictionary;
use std::path::{Path, PathBuf};

pub const DEFAULT_MIN_ENTROPY: f64 = 256.0;

/// Upper bound on the entropy target. Keeps the word count and the whole-bit
/// entropy handed to the estimator well inside `u32`.
pub const MAX_MIN_ENTROPY: f64 = 65_536.0;

/// Frontier-class throughput, 10^18 checks per second.
pub const DEFAULT_CHECKS_EXPONENT: i32 = 18;

/// Minimum entropy a generated passphrase must reach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntropyPolicy {
    min_bits: f64,
}

impl EntropyPolicy {
    pub const DEFAULT: Self = Self {
        min_bits: DEFAULT_MIN_ENTROPY,
    };

    pub fn new(min_bits: f64) -> Result<Self> {
        if !min_bits.is_finite() || min_bits <= 0.0 {
            return Err(PassphraseError::InvalidInput(format!(
                "minimum entropy must be a positive number of bits, got {}",
                min_bits
            )));
        }

        if min_bits > MAX_MIN_ENTROPY {
            return Err(PassphraseError::InvalidInput(format!(
                "minimum entropy of {} bits exceeds the maximum of {} bits",
                min_bits, MAX_MIN_ENTROPY
            )));
        }

        Ok(Self { min_bits })
    }

    pub fn min_bits(&self) -> f64 {
        self.min_bits
    }
}

impl Default for EntropyPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Assumed attacker throughput for exhaustive search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRate {
    checks_per_second: f64,
}

impl SearchRate {
    pub fn new(checks_per_second: f64) -> Result<Self> {
        if !checks_per_second.is_finite() || checks_per_second <= 0.0 {
            return Err(PassphraseError::InvalidInput(format!(
                "checks per second must be positive and finite, got {}",
                checks_per_second
            )));
        }

        Ok(Self { checks_per_second })
    }

    /// `10^exponent` checks per second.
    pub fn from_exponent(exponent: i32) -> Result<Self> {
        Self::new(10f64.powi(exponent))
    }

    pub fn checks_per_second(&self) -> f64 {
        self.checks_per_second
    }
}

impl Default for SearchRate {
    fn default() -> Self {
        Self {
            checks_per_second: 1e18,
        }
    }
}

/// Everything the generator and estimator need for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub policy: EntropyPolicy,
    pub rate: SearchRate,
    pub checks_exponent: i32,
    pub dictionary: Dictionary,
    pub wordlist: Option<PathBuf>,
}

impl Settings {
    pub fn new(
        min_entropy: f64,
        checks_exponent: i32,
        dictionary: Dictionary,
        wordlist: Option<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            policy: EntropyPolicy::new(min_entropy)?,
            rate: SearchRate::from_exponent(checks_exponent)?,
            checks_exponent,
            dictionary,
            wordlist,
        })
    }

    /// The explicit word list path if one was given, else the dictionary's.
    pub fn wordlist_path(&self) -> &Path {
        self.wordlist
            .as_deref()
            .unwrap_or_else(|| self.dictionary.path())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            policy: EntropyPolicy::default(),
            rate: SearchRate::default(),
            checks_exponent: DEFAULT_CHECKS_EXPONENT,
            dictionary: Dictionary::default(),
            wordlist: None,
        }
    }
}

/// Parses an interactive answer for the minimum entropy, in whole bits.
pub fn parse_min_entropy(answer: &str) -> Option<EntropyPolicy> {
    let bits: u32 = answer.trim().parse().ok()?;
    EntropyPolicy::new(bits as f64).ok()
}

/// Parses an interactive answer for `N` in `10^N` checks per second.
pub fn parse_checks_exponent(answer: &str) -> Option<(i32, SearchRate)> {
    let exponent: i32 = answer.trim().parse().ok()?;
    SearchRate::from_exponent(exponent)
        .ok()
        .map(|rate| (exponent, rate))
}

/// `1` selects the common dictionary, `2` the complex one.
pub fn parse_dictionary_choice(answer: &str) -> Option<Dictionary> {
    match answer.trim() {
        "1" => Some(Dictionary::Common),
        "2" => Some(Dictionary::Complex),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(EntropyPolicy::default().min_bits(), 256.0);
        assert_eq!(SearchRate::default().checks_per_second(), 1e18);
        assert_eq!(
            SearchRate::from_exponent(DEFAULT_CHECKS_EXPONENT).unwrap(),
            SearchRate::default()
        );
    }

    #[test]
    fn test_entropy_policy_rejects_non_positive() {
        for bits in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    EntropyPolicy::new(bits),
                    Err(PassphraseError::InvalidInput(_))
                ),
                "Entropy target {} should be rejected",
                bits
            );
        }
        assert_eq!(EntropyPolicy::new(0.5).unwrap().min_bits(), 0.5);
    }

    #[test]
    fn test_entropy_policy_cap() {
        assert_eq!(
            EntropyPolicy::new(MAX_MIN_ENTROPY).unwrap().min_bits(),
            65_536.0
        );

        for bits in [MAX_MIN_ENTROPY + 0.5, 1e12, f64::MAX] {
            let err = EntropyPolicy::new(bits).unwrap_err();
            assert!(
                err.to_string().contains("exceeds the maximum"),
                "Target {} should hit the cap, got {}",
                bits,
                err
            );
        }

        assert!(parse_min_entropy("65537").is_none());
        assert!(Settings::new(1e12, 18, Dictionary::Complex, None).is_err());
    }

    #[test]
    fn test_search_rate_rejects_non_positive() {
        for rate in [0.0, -1e9, f64::NAN, f64::INFINITY] {
            assert!(SearchRate::new(rate).is_err(), "Rate {} should be rejected", rate);
        }
    }

    #[test]
    fn test_search_rate_from_exponent() {
        assert_eq!(SearchRate::from_exponent(9).unwrap().checks_per_second(), 1e9);
        assert_eq!(SearchRate::from_exponent(0).unwrap().checks_per_second(), 1.0);
        assert!(SearchRate::from_exponent(-3).unwrap().checks_per_second() > 0.0);
        assert!(SearchRate::from_exponent(400).is_err());
        assert!(SearchRate::from_exponent(-400).is_err());
    }

    #[test]
    fn test_settings_wordlist_path() {
        let settings = Settings::default();
        assert_eq!(settings.wordlist_path(), Path::new("/usr/share/dict/words"));

        let settings = Settings::new(128.0, 9, Dictionary::Common, None).unwrap();
        assert_eq!(settings.wordlist_path(), Path::new("./30k.txt"));
        assert_eq!(settings.rate.checks_per_second(), 1e9);

        let settings =
            Settings::new(128.0, 9, Dictionary::Common, Some(PathBuf::from("words.txt"))).unwrap();
        assert_eq!(settings.wordlist_path(), Path::new("words.txt"));
    }

    #[test]
    fn test_settings_rejects_bad_values() {
        assert!(Settings::new(0.0, 18, Dictionary::Complex, None).is_err());
        assert!(Settings::new(256.0, 500, Dictionary::Complex, None).is_err());
    }

    #[test]
    fn test_parse_interactive_answers() {
        assert_eq!(parse_min_entropy(" 128\n").unwrap().min_bits(), 128.0);
        assert!(parse_min_entropy("0").is_none());
        assert!(parse_min_entropy("-5").is_none());
        assert!(parse_min_entropy("lots").is_none());
        assert!(parse_min_entropy("").is_none());

        let (exponent, rate) = parse_checks_exponent("12").unwrap();
        assert_eq!(exponent, 12);
        assert_eq!(rate.checks_per_second(), 1e12);
        assert!(parse_checks_exponent("1e9").is_none());
        assert!(parse_checks_exponent("999").is_none());

        assert_eq!(parse_dictionary_choice("1"), Some(Dictionary::Common));
        assert_eq!(parse_dictionary_choice(" 2 "), Some(Dictionary::Complex));
        assert_eq!(parse_dictionary_choice("3"), None);
    }
}
