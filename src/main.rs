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

mod ui;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use entropass::config::{DEFAULT_CHECKS_EXPONENT, DEFAULT_MIN_ENTROPY, Settings};
use entropass::{Dictionary, Outcome, WordList, estimate, generate_passphrase};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "entropass",
    version,
    author,
    about = "Diceware passphrase generator that grows until it reaches a target entropy"
)]
struct Cli {
    /// Minimum entropy in bits
    #[arg(short = 'e', long, default_value_t = DEFAULT_MIN_ENTROPY)]
    min_entropy: f64,

    /// Attacker speed as N in 10^N checks per second
    #[arg(
        short = 'c',
        long,
        default_value_t = DEFAULT_CHECKS_EXPONENT,
        allow_negative_numbers = true
    )]
    checks_exponent: i32,

    #[arg(short, long, value_enum, default_value = "complex")]
    dictionary: DictionaryArg,

    /// Word list file, one word per line; overrides --dictionary
    #[arg(short, long)]
    wordlist: Option<PathBuf>,

    /// Ask for the settings instead of taking them from flags
    #[arg(short, long)]
    interactive: bool,

    /// Skip the re-entry check
    #[arg(long)]
    no_verify: bool,

    /// Print only the passphrase
    #[arg(short, long)]
    quiet: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
enum DictionaryArg {
    Common,
    Complex,
}

impl From<DictionaryArg> for Dictionary {
    fn from(arg: DictionaryArg) -> Self {
        match arg {
            DictionaryArg::Common => Dictionary::Common,
            DictionaryArg::Complex => Dictionary::Complex,
        }
    }
}

fn init_logging(level: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let options = ui::DisplayOptions::detect(cli.quiet);

    let settings = Settings::new(
        cli.min_entropy,
        cli.checks_exponent,
        cli.dictionary.into(),
        cli.wordlist,
    )
    .context("Invalid settings")?;

    let settings = if cli.interactive {
        ui::prompt_settings(settings)?
    } else {
        settings
    };
    debug!(?settings, "resolved settings");

    let ((wordlist, passphrase), elapsed) =
        ui::show_progress(&options, "Generating passphrase...", || {
            let wordlist = WordList::load(settings.wordlist_path())?;
            let passphrase = generate_passphrase(&wordlist, &settings.policy)?;
            Ok((wordlist, passphrase))
        })?;

    let estimate = estimate(passphrase.whole_bits(), &settings.rate);
    info!(
        words = passphrase.word_count(),
        bits_entropy = estimate.bits_entropy,
        "passphrase generated"
    );

    ui::display_output(&passphrase, &estimate, &wordlist, &settings, elapsed, &options);

    if cli.no_verify {
        return Ok(());
    }

    let state = ui::run_verification(&passphrase, &options)?;
    if state.outcome != Outcome::Verified {
        anyhow::bail!("Passphrase verification failed");
    }

    Ok(())
}
