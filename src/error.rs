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

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while building or assessing a passphrase.
#[derive(Debug, Error)]
pub enum PassphraseError {
    /// A word list, entropy target or search rate was rejected.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The operating system random source could not be read.
    #[error("secure random source unavailable: {0}")]
    RandomSourceUnavailable(String),

    /// The word list file could not be read.
    #[error("failed to read word list {}: {source}", path.display())]
    WordListRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PassphraseError>;
