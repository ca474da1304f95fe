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

use anyhow::{Context, Result};
use console::{Style, Term};
use entropass::config::{
    Settings, parse_checks_exponent, parse_dictionary_choice, parse_min_entropy,
};
use entropass::verify::DEFAULT_ATTEMPTS;
use entropass::{CrackEstimate, Outcome, Passphrase, VerificationState, WordList, verify};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};
use tracing::warn;
use zeroize::Zeroizing;

pub const MIN_SAFE_ENTROPY: f64 = 100.0;
pub const PARANOID_ENTROPY: f64 = 300.0;

const FRAME_WIDTH: usize = 30;

pub struct DisplayOptions {
    pub unicode_support: bool,
    pub color_support: bool,
    pub quiet: bool,
}

impl DisplayOptions {
    pub fn detect(quiet: bool) -> Self {
        Self {
            unicode_support: detect_unicode_support(),
            color_support: detect_color_support(),
            quiet,
        }
    }

    fn style(&self, secure: bool) -> Style {
        if !self.color_support {
            Style::new()
        } else if secure {
            Style::new().green()
        } else {
            Style::new().yellow()
        }
    }
}

pub fn detect_unicode_support() -> bool {
    supports_unicode::on(supports_unicode::Stream::Stdout)
}

pub fn detect_color_support() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

pub fn get_status_symbols(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("✓", "!")
    } else {
        ("+", "!")
    }
}

fn tree_branches(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("├─", "└─")
    } else {
        ("|-", "`-")
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

pub fn entropy_rating(bits: f64) -> (&'static str, bool) {
    if bits >= PARANOID_ENTROPY {
        ("Paranoid", true)
    } else if bits >= MIN_SAFE_ENTROPY {
        ("Strong", true)
    } else {
        ("Weak", false)
    }
}

fn prompt_line(question: &str) -> Result<String> {
    print!("{}", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read answer")?;
    Ok(input.trim().to_string())
}

fn report_invalid(field: &str, answer: &str) {
    warn!(field, answer, "invalid interactive answer, keeping default");
    println!("Invalid input, using default");
}

/// Asks the configuration questions, keeping `defaults` for any value that
/// is skipped or does not parse.
pub fn prompt_settings(defaults: Settings) -> Result<Settings> {
    let mut settings = defaults;

    match prompt_line("Would you like to use default settings (y/n)? ")?.as_str() {
        "y" => return Ok(settings),
        "n" => {}
        other => {
            report_invalid("defaults", other);
            return Ok(settings);
        }
    }

    let answer = prompt_line(&format!(
        "Please enter the minimum entropy (bits) (default = {}): ",
        settings.policy.min_bits()
    ))?;
    match parse_min_entropy(&answer) {
        Some(policy) => settings.policy = policy,
        None => report_invalid("min_entropy", &answer),
    }

    let answer = prompt_line(&format!(
        "Please enter the number of checks per second (10^N) (default N = {}): ",
        settings.checks_exponent
    ))?;
    match parse_checks_exponent(&answer) {
        Some((exponent, rate)) => {
            settings.checks_exponent = exponent;
            settings.rate = rate;
        }
        None => report_invalid("checks_exponent", &answer),
    }

    let answer = prompt_line(
        "Please choose complexity of words (1 = common, 2 = complex (default)): ",
    )?;
    match parse_dictionary_choice(&answer) {
        Some(dictionary) => settings.dictionary = dictionary,
        None => report_invalid("dictionary", &answer),
    }

    Ok(settings)
}

pub fn show_progress<F, T>(options: &DisplayOptions, message: &str, f: F) -> Result<(T, Duration)>
where
    F: FnOnce() -> Result<T>,
{
    let term = Term::stderr();
    term.hide_cursor().ok();

    let pb = if options.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };

    if options.unicode_support {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠋"]),
        );
    } else {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("-\\|/-"),
        );
    }

    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));

    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();

    pb.finish_and_clear();
    term.show_cursor().ok();

    result.map(|r| (r, elapsed))
}

pub fn display_output(
    passphrase: &Passphrase,
    estimate: &CrackEstimate,
    wordlist: &WordList,
    settings: &Settings,
    elapsed: Duration,
    options: &DisplayOptions,
) {
    if options.quiet {
        println!("{}", passphrase.as_str());
        return;
    }

    println!("{}", "#".repeat(FRAME_WIDTH));
    println!("{}", passphrase.as_str());
    println!("{}\n", "#".repeat(FRAME_WIDTH));

    display_settings(wordlist, settings, options);
    display_stats(passphrase, estimate, elapsed, options);
}

fn display_settings(wordlist: &WordList, settings: &Settings, options: &DisplayOptions) {
    let (branch, last) = tree_branches(options.unicode_support);
    let source = wordlist
        .source()
        .unwrap_or_else(|| settings.wordlist_path())
        .display();
    let label = if settings.wordlist.is_some() {
        "Custom"
    } else {
        settings.dictionary.label()
    };

    println!("Settings:");
    println!(
        "  {} Wordlist   {} ({}, {} {})",
        branch,
        label,
        source,
        wordlist.len(),
        plural(wordlist.len(), "word", "words")
    );
    println!(
        "  {} Target     {} bits",
        branch,
        settings.policy.min_bits()
    );
    println!(
        "  {} Rate       10^{} checks/s",
        branch, settings.checks_exponent
    );
    println!("  {} Keystream  ChaCha20 (OS-seeded)", branch);
    println!("  {} Sampling   Unbiased rejection", last);
    println!();
}

fn display_stats(
    passphrase: &Passphrase,
    estimate: &CrackEstimate,
    elapsed: Duration,
    options: &DisplayOptions,
) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);
    let (branch, last) = tree_branches(options.unicode_support);

    let (status_text, secure) = entropy_rating(passphrase.bits_entropy());
    let status_icon = if secure { check_ok } else { check_warn };
    let entropy_style = options.style(secure);

    let quantum_secure = estimate.quantum_years.log10() >= 0.0;
    let quantum_style = options.style(quantum_secure);
    let length = passphrase.as_str().chars().count();

    println!("Stats:");
    println!(
        "  {} Entropy    {} {} bits ({})",
        branch,
        entropy_style.apply_to(format!("[{}]", status_icon)),
        entropy_style.apply_to(estimate.bits_entropy),
        entropy_style.apply_to(status_text)
    );
    println!(
        "  {} Words      {} {}",
        branch,
        passphrase.word_count(),
        plural(passphrase.word_count(), "word", "words")
    );
    println!(
        "  {} Length     {} {}",
        branch,
        length,
        plural(length, "char", "chars")
    );
    println!(
        "  {} Qubits     {} required",
        branch, estimate.qubits_required
    );
    println!(
        "  {} Classical  {} years",
        branch,
        entropy_style.apply_to(estimate.classical_years)
    );
    println!(
        "  {} Quantum    {} years",
        branch,
        quantum_style.apply_to(estimate.quantum_years)
    );
    println!("  {} Time       {:.1}s", last, elapsed.as_secs_f64());

    println!(
        "\n{} Security: {}",
        entropy_style.apply_to(format!("[{}]", status_icon)),
        entropy_style.apply_to(status_text)
    );
}

const VERIFY_PROMPT: &str = "Please enter the passphrase to verify: ";

/// Reads one attempt: hidden when stdin is a terminal, a plain line otherwise.
fn read_attempt() -> Result<Zeroizing<String>> {
    if io::stdin().is_terminal() {
        let candidate =
            rpassword::prompt_password(VERIFY_PROMPT).context("Failed to read passphrase")?;
        return Ok(Zeroizing::new(candidate));
    }

    print!("{}", VERIFY_PROMPT);
    io::stdout().flush()?;

    let mut line = Zeroizing::new(String::new());
    let read = io::stdin()
        .read_line(&mut line)
        .context("Failed to read passphrase")?;
    if read == 0 {
        anyhow::bail!("Input closed before the passphrase was verified");
    }
    println!();

    Ok(line)
}

/// Asks for the passphrase until it matches or the attempts run out.
pub fn run_verification(
    passphrase: &Passphrase,
    options: &DisplayOptions,
) -> Result<VerificationState> {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);
    let warn_tag = options.style(false).apply_to(format!("[{}]", check_warn));

    println!();
    let state = verify(passphrase, |state| {
        if state.attempts_remaining < DEFAULT_ATTEMPTS {
            println!(
                "{} Verification failed. Remaining attempts: {}",
                warn_tag, state.attempts_remaining
            );
        }
        read_attempt()
    })?;

    match state.outcome {
        Outcome::Verified => println!(
            "{} Passphrase verified",
            options.style(true).apply_to(format!("[{}]", check_ok))
        ),
        Outcome::Exhausted | Outcome::Pending => println!(
            "{} Verification failed. No attempts remaining",
            warn_tag
        ),
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_status_symbols_unicode() {
        let (ok, warn) = get_status_symbols(true);
        assert_eq!(ok, "✓");
        assert_eq!(warn, "!");
    }

    #[test]
    fn test_get_status_symbols_ascii() {
        let (ok, warn) = get_status_symbols(false);
        assert_eq!(ok, "+");
        assert_eq!(warn, "!");
    }

    #[test]
    fn test_entropy_rating() {
        assert_eq!(entropy_rating(64.0), ("Weak", false));
        assert_eq!(entropy_rating(100.0), ("Strong", true));
        assert_eq!(entropy_rating(258.5), ("Strong", true));
        assert_eq!(entropy_rating(300.0), ("Paranoid", true));
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "word", "words"), "word");
        assert_eq!(plural(0, "word", "words"), "words");
        assert_eq!(plural(20, "char", "chars"), "chars");
    }

    #[test]
    fn test_tree_branches_ascii_fallback() {
        assert_eq!(tree_branches(false), ("|-", "`-"));
        assert_eq!(tree_branches(true), ("├─", "└─"));
    }

    #[test]
    fn test_plain_style_without_color() {
        let options = DisplayOptions {
            unicode_support: false,
            color_support: false,
            quiet: false,
        };
        assert_eq!(options.style(false).apply_to("x").to_string(), "x");
    }
}
