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
use std::path::{Path, PathBuf};
use tracing::info;

pub const MIN_WORDLIST_SIZE: usize = 2;

pub const COMMON_DICTIONARY: &str = "./30k.txt";
pub const COMPLEX_DICTIONARY: &str = "/usr/share/dict/words";

/// Named word sources selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dictionary {
    Common,
    #[default]
    Complex,
}

impl Dictionary {
    pub fn path(self) -> &'static Path {
        match self {
            Dictionary::Common => Path::new(COMMON_DICTIONARY),
            Dictionary::Complex => Path::new(COMPLEX_DICTIONARY),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dictionary::Common => "Common",
            Dictionary::Complex => "Complex",
        }
    }
}

/// An immutable list of candidate words.
///
/// Duplicates are kept: each entry counts as one option, which is what the
/// entropy accounting in [`crate::generator`] assumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
    source: Option<PathBuf>,
}

impl WordList {
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();

        if let Some(index) = words.iter().position(|w| w.trim().is_empty()) {
            return Err(PassphraseError::InvalidInput(format!(
                "word at index {} is empty",
                index
            )));
        }

        if words.len() < MIN_WORDLIST_SIZE {
            return Err(PassphraseError::InvalidInput(format!(
                "word list must contain at least {} words, found {}",
                MIN_WORDLIST_SIZE,
                words.len()
            )));
        }

        Ok(Self {
            words,
            source: None,
        })
    }

    /// Parses newline separated words, one per line.
    ///
    /// Blank lines are skipped and surrounding whitespace is trimmed. Lines in
    /// diceware format (`11111<TAB>abacus`) keep only the word.
    pub fn parse(data: &str) -> Result<Self> {
        let words: Vec<&str> = data
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(strip_dice_roll)
            .collect();

        Self::new(words)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| PassphraseError::WordListRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut list = Self::parse(&data)?;
        list.source = Some(path.to_path_buf());

        info!(path = %path.display(), words = list.len(), "loaded word list");
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Bits contributed by one uniformly drawn word.
    pub fn bits_per_word(&self) -> f64 {
        (self.words.len() as f64).log2()
    }
}

fn strip_dice_roll(line: &str) -> &str {
    match line.split_once(['\t', ' ']) {
        Some((roll, word))
            if !roll.is_empty()
                && roll.bytes().all(|b| (b'1'..=b'6').contains(&b))
                && !word.trim().is_empty() =>
        {
            word.trim()
        }
        _ => line,
    }
}
