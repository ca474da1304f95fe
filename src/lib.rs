pub mod config;
pub mod error;
pub mod estimate;
pub mod generator;
pub mod verify;
pub mod wordlist;

pub use config::{EntropyPolicy, SearchRate};
pub use error::{PassphraseError, Result};
pub use estimate::{CrackEstimate, Years, estimate};
pub use generator::{Passphrase, generate_passphrase, generate_passphrase_with_key};
pub use verify::{Outcome, VerificationState, Verifier, verify};
pub use wordlist::{Dictionary, WordList};
