//! Orthography-to-phonology transcription.
//!
//! A language ([`OrthoPhonology`]) combines a sound inventory, an alphabet
//! mapping graphemes to phonemes, and an ordered list of phonological rules.
//! Languages are plain values, built programmatically or compiled from a TOML
//! definition.
//!
//! # Architecture
//!
//! - [`alphabet`] -- Grapheme table with longest-match lookup
//! - [`inventory`] -- Sound inventory, symbol lookup and diacritic derivation
//! - [`transcriber`] -- Tokenize, rewrite, render; syllabifier seam
//! - [`config`] -- TOML language definitions
//! - [`languages`] -- Bundled language definitions

pub mod alphabet;
pub mod config;
pub mod inventory;
pub mod languages;
pub mod transcriber;

pub use alphabet::Alphabet;
pub use config::{ConfigError, parse_language_toml};
pub use inventory::Inventory;
pub use transcriber::{
    OrthoPhonology, Syllabifier, TranscribeOptions, UnknownGraphemePolicy,
    UnresolvedPhonemePolicy,
};

/// Error type for tokenization and transcription.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranscribeError {
    /// No alphabet entry starts at `position` (a character index) of `word`.
    #[error("unknown grapheme {grapheme:?} at position {position} in {word:?}")]
    UnknownGrapheme {
        word: String,
        position: usize,
        grapheme: String,
    },

    /// No symbol could be found or derived for a phoneme.
    #[error("no symbol for phoneme {features}")]
    UnresolvedPhoneme { features: String },
}
