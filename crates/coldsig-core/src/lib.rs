//! Coldsig Core
//!
//! The seed-and-key custody core of an offline transaction-signing library.
//!
//! # What it does
//!
//! - Decodes mnemonic phrases into raw secret key material and re-renders
//!   them in any supported language ([`monero`], [`polyseed`], [`legacy`]).
//! - Classifies seeds by a short content-derived fingerprint and registers
//!   them for handle or fingerprint lookup ([`seedjar`]).
//! - Hands wallet and transaction code opaque, revocable handles instead of
//!   raw key bytes ([`keyjar`]).
//!
//! # Custody rules
//!
//! A seed exclusively owns its [`keystore::KeyStore`]; the key jar copies —
//! never aliases — key bytes it stores; registered seeds are shared between
//! the jar and external holders via `Arc`. Everything secret is zeroed on
//! drop. All operations are synchronous and in-memory; blocking happens
//! only on a jar's mutex, never on I/O.
//!
//! # Example
//!
//! ```
//! use coldsig_core::{Custody, Network};
//! use coldsig_core::monero::MoneroSeed;
//!
//! let custody = Custody::new();
//! let seed = MoneroSeed::generate(Network::Main);
//! let (seed_handle, key_handle) = custody.adopt(seed).unwrap();
//!
//! // Downstream code only ever sees the handles.
//! assert!(custody.seeds.has(seed_handle));
//! assert!(custody.keys.get(key_handle).is_some());
//! custody.keys.remove(key_handle);
//! assert!(custody.keys.get(key_handle).is_none());
//! ```

pub mod crypto;
pub mod custody;
pub mod height;
pub mod keyjar;
pub mod keystore;
pub mod language;
pub mod legacy;
pub mod memory;
pub mod monero;
pub mod password;
pub mod polyseed;
pub mod seed;
pub mod seedjar;
pub mod wallet;

// Re-exports
pub use custody::Custody;
pub use height::{ChainClock, LinearClock};
pub use keyjar::{KeyGuard, KeyJar};
pub use keystore::KeyStore;
pub use language::{LanguageError, SeedLanguage};
pub use seed::{DecodeOpts, Seed, SeedError};
pub use seedjar::{SeedJar, SeedJarError};
pub use wallet::Wallet;

use serde::{Deserialize, Serialize};

/// Network a seed or wallet belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    #[default]
    Main,
    Test,
    Stage,
}

/// Mnemonic scheme family, used to select compatible language dictionaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeedType {
    /// 25-word (and legacy 13-word) phrases.
    Monero,
    /// 16-word phrases with an embedded birthday.
    Polyseed,
}

/// Failure classification, stable across the library.
///
/// An outer ABI layer translates each kind into a numeric code; within the
/// library every error is raised at the point of violation and propagates
/// unhandled — no retries, no silent fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input shape: an invalid phrase word, a corrupt checksum.
    InvalidArgument,
    /// Lookup miss: unknown language, seed or handle.
    OutOfRange,
    /// Operation violates a library-level precondition.
    DomainError,
}

/// Opaque nonzero handle to a key held by a [`KeyJar`]. 0 is reserved.
pub type KeyHandle = u64;

/// Opaque nonzero handle to a seed held by a [`SeedJar`]. 0 is reserved.
pub type SeedHandle = u64;
