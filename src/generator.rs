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

use crate::config::EntropyPolicy;
use crate::error::{PassphraseError, Result};
use crate::wordlist::WordList;
use chacha20::ChaCha20;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use rand::RngCore;
use rand::rngs::OsRng;
use std::fmt;
use tracing::debug;
use zeroize::Zeroizing;

pub const KEY_LEN: usize = 32;
pub const SEPARATOR: &str = " ";

const BUFFER_LEN: usize = 512;

/// A finalized passphrase and the entropy it carries.
///
/// Both the joined text and the individual words are wiped on drop.
pub struct Passphrase {
    text: Zeroizing<String>,
    words: Zeroizing<Vec<String>>,
    bits_entropy: f64,
}

impl Passphrase {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn bits_entropy(&self) -> f64 {
        self.bits_entropy
    }

    /// Entropy truncated to whole bits, as reported and fed to the estimator.
    ///
    /// Passphrases only come from an [`EntropyPolicy`], whose cap keeps this
    /// below `MAX_MIN_ENTROPY + 32`, so the conversion never saturates.
    pub fn whole_bits(&self) -> u32 {
        self.bits_entropy.floor() as u32
    }

    #[cfg(test)]
    pub(crate) fn from_words(words: Vec<String>, bits_entropy: f64) -> Self {
        Self {
            text: Zeroizing::new(words.join(SEPARATOR)),
            words: Zeroizing::new(words),
            bits_entropy,
        }
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Passphrase")
            .field("word_count", &self.words.len())
            .field("bits_entropy", &self.bits_entropy)
            .finish_non_exhaustive()
    }
}

/// Uniform index source over a ChaCha20 keystream.
///
/// Indices are drawn from 32-bit keystream words with rejection sampling,
/// so every index below `bound` is equally likely.
struct IndexSampler {
    cipher: ChaCha20,
    buffer: Zeroizing<Vec<u8>>,
    pos: usize,
}

impl IndexSampler {
    fn new(key: &[u8; KEY_LEN]) -> Self {
        let mut cipher = ChaCha20::new(key.into(), &[0u8; 12].into());
        let mut buffer = Zeroizing::new(vec![0u8; BUFFER_LEN]);
        cipher.apply_keystream(&mut buffer);

        Self {
            cipher,
            buffer,
            pos: 0,
        }
    }

    fn next_u32(&mut self) -> u32 {
        if self.pos + 4 > self.buffer.len() {
            self.buffer.fill(0);
            self.cipher.apply_keystream(&mut self.buffer);
            self.pos = 0;
        }

        let bytes = [
            self.buffer[self.pos],
            self.buffer[self.pos + 1],
            self.buffer[self.pos + 2],
            self.buffer[self.pos + 3],
        ];
        self.pos += 4;
        u32::from_le_bytes(bytes)
    }

    fn next_index(&mut self, bound: u32) -> usize {
        let range = 1u64 << 32;
        let rejection_threshold = range - (range % bound as u64);

        loop {
            let value = self.next_u32();
            if (value as u64) < rejection_threshold {
                return (value % bound) as usize;
            }
        }
    }
}

/// Builds a passphrase from `wordlist` that reaches the policy's entropy,
/// keyed from the operating system CSPRNG.
pub fn generate_passphrase(wordlist: &WordList, policy: &EntropyPolicy) -> Result<Passphrase> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    OsRng
        .try_fill_bytes(&mut key[..])
        .map_err(|e| PassphraseError::RandomSourceUnavailable(e.to_string()))?;

    generate_passphrase_with_key(wordlist, policy, &key)
}

/// Deterministic variant of [`generate_passphrase`] for a caller-supplied key.
pub fn generate_passphrase_with_key(
    wordlist: &WordList,
    policy: &EntropyPolicy,
    key: &[u8; KEY_LEN],
) -> Result<Passphrase> {
    let bound = u32::try_from(wordlist.len()).map_err(|_| {
        PassphraseError::InvalidInput(format!(
            "word list too large ({} words, maximum is {})",
            wordlist.len(),
            u32::MAX
        ))
    })?;
    if bound < 2 {
        return Err(PassphraseError::InvalidInput(format!(
            "word list must contain at least 2 words, found {}",
            bound
        )));
    }

    let target = policy.min_bits();
    let bits_per_word = wordlist.bits_per_word();

    let mut sampler = IndexSampler::new(key);
    let mut words = Zeroizing::new(Vec::new());
    let mut bits_entropy = 0.0;

    while bits_entropy < target {
        let index = sampler.next_index(bound);
        words.push(wordlist.words()[index].clone());
        bits_entropy = words.len() as f64 * bits_per_word;
    }

    debug!(
        words = words.len(),
        bits_entropy,
        target,
        "passphrase reached entropy target"
    );

    Ok(Passphrase {
        text: Zeroizing::new(words.join(SEPARATOR)),
        words,
        bits_entropy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters() -> WordList {
        WordList::new(["a", "b", "c", "d"]).unwrap()
    }

    fn policy(bits: f64) -> EntropyPolicy {
        EntropyPolicy::new(bits).unwrap()
    }

    #[test]
    fn test_four_words_for_eight_bits() {
        let passphrase = generate_passphrase(&letters(), &policy(8.0)).unwrap();
        assert_eq!(passphrase.word_count(), 4);
        assert_eq!(passphrase.bits_entropy(), 8.0);
        assert_eq!(passphrase.whole_bits(), 8);
    }

    #[test]
    fn test_at_least_one_word() {
        let passphrase = generate_passphrase(&letters(), &policy(0.1)).unwrap();
        assert_eq!(passphrase.word_count(), 1);
        assert_eq!(passphrase.bits_entropy(), 2.0);
    }

    #[test]
    fn test_single_space_separator() {
        let list = WordList::new(["alpha", "bravo", "charlie", "delta", "echo"]).unwrap();
        let passphrase = generate_passphrase(&list, &policy(64.0)).unwrap();
        let text = passphrase.as_str();

        assert_eq!(text, text.trim());
        assert!(!text.contains("  "));
        assert_eq!(text.split(' ').count(), passphrase.word_count());
        assert_eq!(passphrase.words().join(" "), text);
        for word in passphrase.words() {
            assert!(list.words().contains(word));
        }
    }

    #[test]
    fn test_default_policy_on_large_list() {
        let list = WordList::new((0..7776).map(|i| format!("w{}", i))).unwrap();
        let passphrase = generate_passphrase(&list, &EntropyPolicy::default()).unwrap();

        // ceil(256 / log2(7776)) = 20
        assert_eq!(passphrase.word_count(), 20);
        assert!(passphrase.bits_entropy() >= 256.0);
        assert_eq!(passphrase.whole_bits(), 258);
    }

    #[test]
    fn test_whole_bits_at_entropy_cap() {
        let list = WordList::new(["heads", "tails", "edge"]).unwrap();
        let policy = EntropyPolicy::new(crate::config::MAX_MIN_ENTROPY).unwrap();
        let passphrase = generate_passphrase_with_key(&list, &policy, &[9u8; 32]).unwrap();

        // ceil(65536 / log2(3)) = 41349
        assert_eq!(passphrase.word_count(), 41_349);
        assert!(passphrase.bits_entropy() >= 65_536.0);
        assert_eq!(
            passphrase.whole_bits() as f64,
            passphrase.bits_entropy().floor()
        );
        assert_eq!(passphrase.whole_bits(), 65_536);
    }

    #[test]
    fn test_keyed_generation_deterministic() {
        let key = [42u8; 32];
        let list = WordList::new((0..100).map(|i| format!("w{}", i))).unwrap();
        let first = generate_passphrase_with_key(&list, &policy(128.0), &key).unwrap();
        let second = generate_passphrase_with_key(&list, &policy(128.0), &key).unwrap();
        assert_eq!(first.as_str(), second.as_str());

        let other = generate_passphrase_with_key(&list, &policy(128.0), &[7u8; 32]).unwrap();
        assert_ne!(first.as_str(), other.as_str());
    }

    #[test]
    fn test_os_keyed_generation_differs() {
        let list = WordList::new((0..1000).map(|i| format!("w{}", i))).unwrap();
        let first = generate_passphrase(&list, &policy(128.0)).unwrap();
        let second = generate_passphrase(&list, &policy(128.0)).unwrap();
        assert_ne!(first.as_str(), second.as_str());
    }

    #[test]
    fn test_sampler_covers_every_index() {
        let mut sampler = IndexSampler::new(&[1u8; 32]);
        let mut seen = [0usize; 6];
        for _ in 0..6000 {
            seen[sampler.next_index(6)] += 1;
        }
        for (index, count) in seen.iter().enumerate() {
            assert!(
                (800..1200).contains(count),
                "Index {} drawn {} times out of 6000",
                index,
                count
            );
        }
    }

    #[test]
    fn test_sampler_refills_buffer() {
        let mut sampler = IndexSampler::new(&[3u8; 32]);
        let draws: Vec<u32> = (0..BUFFER_LEN).map(|_| sampler.next_u32()).collect();
        assert!(draws.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_debug_hides_words() {
        let list = WordList::new(["secretive", "clandestine"]).unwrap();
        let passphrase = generate_passphrase(&list, &policy(4.0)).unwrap();
        let rendered = format!("{:?}", passphrase);
        assert!(rendered.contains("word_count: 4"));
        assert!(!rendered.contains("secretive"));
        assert!(!rendered.contains("clandestine"));
    }
}
