//! Coldsig Mnemonic
//!
//! Word-list codecs and scalar primitives for the Coldsig custody core.
//!
//! # What lives here
//!
//! - [`dictionary`] — 2048-word language dictionaries backed by the BIP-39
//!   word lists, with exact word/index lookup.
//! - [`electrum`] — the 4-bytes-to-3-words base-2048 codec plus the trailing
//!   checksum word used by the 13- and 25-word phrase layouts.
//! - [`bits`] — MSB-first bit packing for the 16-word payload layout.
//! - [`checksum`] — CRC helpers shared by the phrase codecs.
//! - [`scalar`] — domain-separated hash-to-scalar and unbiased random
//!   scalar generation over curve25519.
//!
//! The custody core treats this crate as its cryptographic collaborator:
//! everything here is deterministic codec and derivation logic, with no
//! custody state of its own.

pub mod bits;
pub mod checksum;
pub mod dictionary;
pub mod electrum;
pub mod scalar;

// Re-exports
pub use dictionary::Dictionary;
pub use electrum::{decode_values, encode_phrase, parse_phrase};
pub use scalar::{hash_to_scalar, hash_to_scalar_tagged, random_scalar};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MnemonicError {
    #[error("word '{0}' is not in the dictionary")]
    InvalidWord(String),
    #[error("checksum word does not match the phrase")]
    InvalidChecksum,
    #[error("expected {expected} words, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("word value out of range for the encoding")]
    ValueOutOfRange,
}
