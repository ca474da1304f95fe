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

use crate::generator::Passphrase;
use subtle::ConstantTimeEq;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

pub const DEFAULT_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pending,
    Verified,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationState {
    pub attempts_remaining: u32,
    pub outcome: Outcome,
}

impl VerificationState {
    pub fn is_terminal(&self) -> bool {
        self.outcome != Outcome::Pending
    }
}

/// Bounded re-entry check against a generated passphrase.
///
/// A matching attempt ends the session without spending budget; each
/// mismatch spends one attempt.
pub struct Verifier {
    expected: Zeroizing<String>,
    state: VerificationState,
}

impl Verifier {
    pub fn new(expected: &Passphrase) -> Self {
        Self::with_attempts(expected, DEFAULT_ATTEMPTS)
    }

    pub fn with_attempts(expected: &Passphrase, attempts: u32) -> Self {
        let outcome = if attempts == 0 {
            Outcome::Exhausted
        } else {
            Outcome::Pending
        };

        Self {
            expected: normalize(expected.as_str()),
            state: VerificationState {
                attempts_remaining: attempts,
                outcome,
            },
        }
    }

    pub fn state(&self) -> VerificationState {
        self.state
    }

    /// Checks one candidate. Has no effect once the session is terminal.
    pub fn attempt(&mut self, candidate: &str) -> VerificationState {
        if self.state.is_terminal() {
            return self.state;
        }

        let candidate = normalize(candidate);
        let matched: bool = candidate.as_bytes().ct_eq(self.expected.as_bytes()).into();

        if matched {
            self.state.outcome = Outcome::Verified;
        } else {
            self.state.attempts_remaining -= 1;
            if self.state.attempts_remaining == 0 {
                self.state.outcome = Outcome::Exhausted;
            }
        }

        debug!(
            outcome = ?self.state.outcome,
            attempts_remaining = self.state.attempts_remaining,
            "verification attempt"
        );
        self.state
    }
}

/// Runs a full session, pulling one candidate per attempt from `next_attempt`
/// until it ends. Errors from the provider are returned unchanged.
pub fn verify<F, E>(expected: &Passphrase, mut next_attempt: F) -> Result<VerificationState, E>
where
    F: FnMut(&VerificationState) -> Result<Zeroizing<String>, E>,
{
    let mut verifier = Verifier::new(expected);

    while !verifier.state().is_terminal() {
        let candidate = next_attempt(&verifier.state())?;
        verifier.attempt(&candidate);
    }

    Ok(verifier.state())
}

fn normalize(s: &str) -> Zeroizing<String> {
    let composed: Zeroizing<String> = Zeroizing::new(s.trim().nfc().collect());
    Zeroizing::new(composed.to_lowercase())
}
