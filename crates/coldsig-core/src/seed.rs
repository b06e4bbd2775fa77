//! Seed hierarchy
//!
//! Three concrete seed kinds behind one closed enum:
//!
//! | kind | words | minted here | encryptable |
//! |------|-------|-------------|-------------|
//! | [`legacy::LegacySeed`](crate::legacy::LegacySeed) | 13 | no (import only) | no |
//! | [`monero::MoneroSeed`](crate::monero::MoneroSeed) | 25 | yes | yes |
//! | [`polyseed::Polyseed`](crate::polyseed::Polyseed) | 16 | yes | yes |
//!
//! A seed owns exactly one [`KeyStore`] and is move-only — cloning would
//! duplicate custody of the secret. Its numeric form (`values`) is a fixed
//! number of dictionary-independent word indices; the phrase is just those
//! indices rendered through a language's word list, so any supported
//! language round-trips to the same values and the same fingerprint.

use sha2::{Digest, Sha256};
use thiserror::Error;

use coldsig_mnemonic::MnemonicError;

use crate::height::ChainClock;
use crate::keystore::KeyStore;
use crate::language::SeedLanguage;
use crate::legacy::LegacySeed;
use crate::monero::MoneroSeed;
use crate::polyseed::Polyseed;
use crate::wallet::Wallet;
use crate::{ErrorKind, Network, SeedType};

const FINGERPRINT_DOMAIN: &[u8] = b"coldsig/fingerprint/v1";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),
    #[error("language '{0}' is not supported for this seed type")]
    UnsupportedLanguage(String),
    #[error("seed is encrypted; decrypt it first")]
    Encrypted,
    #[error("seed is not encrypted")]
    NotEncrypted,
    #[error("seed is already encrypted")]
    AlreadyEncrypted,
    #[error("wrong password")]
    WrongPassword,
    #[error("this seed type does not support encryption")]
    NotEncryptable,
    #[error("reserved feature bits are set")]
    ReservedFeatures,
    #[error("password hashing failed: {0}")]
    Kdf(String),
}

impl SeedError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Mnemonic(_) | Self::WrongPassword | Self::ReservedFeatures => {
                ErrorKind::InvalidArgument
            }
            Self::UnsupportedLanguage(_)
            | Self::Encrypted
            | Self::NotEncrypted
            | Self::AlreadyEncrypted
            | Self::NotEncryptable
            | Self::Kdf(_) => ErrorKind::DomainError,
        }
    }
}

/// Optional context for the decode factories.
///
/// `birthday` and `height` are two views of the same approximate creation
/// time; zero means unset, and the missing one is derived on demand through
/// a [`ChainClock`]. `encrypted` marks a phrase imported in its encrypted
/// form where the scheme cannot detect that in-band.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOpts {
    pub network: Network,
    pub birthday: u64,
    pub height: u64,
    pub encrypted: bool,
}

/// One seed of any kind. See the module docs for the kind matrix.
#[derive(Debug)]
pub enum Seed {
    Legacy(LegacySeed),
    Monero(MoneroSeed),
    Polyseed(Polyseed),
}

impl Seed {
    pub fn seed_type(&self) -> SeedType {
        match self {
            Self::Legacy(_) | Self::Monero(_) => SeedType::Monero,
            Self::Polyseed(_) => SeedType::Polyseed,
        }
    }

    /// The language-independent numeric form: word indices, checksum word
    /// included. Length is fixed by the seed kind (13 / 25 / 16).
    pub fn values(&self) -> &[u16] {
        match self {
            Self::Legacy(s) => s.values(),
            Self::Monero(s) => s.values(),
            Self::Polyseed(s) => s.values(),
        }
    }

    pub fn network(&self) -> Network {
        match self {
            Self::Legacy(s) => s.network(),
            Self::Monero(s) => s.network(),
            Self::Polyseed(s) => s.network(),
        }
    }

    /// Short display digest of the seed's key material. Stable across
    /// re-encoding into any language.
    pub fn fingerprint(&self) -> &str {
        match self {
            Self::Legacy(s) => s.fingerprint(),
            Self::Monero(s) => s.fingerprint(),
            Self::Polyseed(s) => s.fingerprint(),
        }
    }

    /// Render the numeric form as words of `language`.
    pub fn phrase(&self, language: &SeedLanguage) -> Result<String, SeedError> {
        render_phrase(self.values(), self.seed_type(), language)
    }

    /// Unix seconds of the seed's estimated creation point, deriving from
    /// the stored height when no explicit birthday is set.
    pub fn birthday(&self, clock: &dyn ChainClock) -> u64 {
        match self {
            Self::Legacy(s) => s.birthday(clock),
            Self::Monero(s) => s.birthday(clock),
            Self::Polyseed(s) => s.birthday(),
        }
    }

    /// Chain height of the seed's estimated creation point, deriving from
    /// the birthday when no explicit height is set.
    pub fn height(&self, clock: &dyn ChainClock) -> u64 {
        match self {
            Self::Legacy(s) => s.height(clock),
            Self::Monero(s) => s.height(clock),
            Self::Polyseed(s) => s.height(clock),
        }
    }

    /// Whether this seed kind has an encryption state machine at all.
    pub fn encryptable(&self) -> bool {
        !matches!(self, Self::Legacy(_))
    }

    /// Whether the seed is currently in its encrypted state. Legacy seeds
    /// are always plaintext.
    pub fn encrypted(&self) -> bool {
        match self {
            Self::Legacy(_) => false,
            Self::Monero(s) => s.encrypted(),
            Self::Polyseed(s) => s.encrypted(),
        }
    }

    /// Transition plaintext → encrypted under `password`.
    pub fn encrypt(&mut self, password: &str) -> Result<(), SeedError> {
        match self {
            Self::Legacy(_) => Err(SeedError::NotEncryptable),
            Self::Monero(s) => s.encrypt(password),
            Self::Polyseed(s) => s.encrypt(password),
        }
    }

    /// Transition encrypted → plaintext given the correct password. Fails
    /// closed on a wrong password.
    pub fn decrypt(&mut self, password: &str) -> Result<(), SeedError> {
        match self {
            Self::Legacy(_) => Err(SeedError::NotEncryptable),
            Self::Monero(s) => s.decrypt(password),
            Self::Polyseed(s) => s.decrypt(password),
        }
    }

    /// The secret key. Fails while the seed is encrypted.
    pub fn key(&self) -> Result<&KeyStore, SeedError> {
        match self {
            Self::Legacy(s) => Ok(s.key()),
            Self::Monero(s) => s.key(),
            Self::Polyseed(s) => s.key(),
        }
    }

    /// Hand off to the (external) wallet layer: the key plus a restore
    /// height. Fails while the seed is encrypted.
    pub fn wallet(&self, clock: &dyn ChainClock) -> Result<Wallet, SeedError> {
        let key = self.key()?;
        Ok(Wallet::new(
            KeyStore::from_bytes(*key.as_bytes()),
            self.height(clock),
        ))
    }
}

/// Render numeric values as a phrase in `language`, checking the language
/// supports the seed type first.
pub(crate) fn render_phrase(
    values: &[u16],
    seed_type: SeedType,
    language: &SeedLanguage,
) -> Result<String, SeedError> {
    if !language.supported(seed_type) {
        return Err(SeedError::UnsupportedLanguage(language.code().to_string()));
    }
    let dict = language
        .dictionary()
        .ok_or_else(|| SeedError::UnsupportedLanguage(language.code().to_string()))?;
    let words = dict.words();
    let mut rendered = Vec::with_capacity(values.len());
    for &value in values {
        match words.get(value as usize) {
            Some(word) => rendered.push(*word),
            None => return Err(SeedError::Mnemonic(MnemonicError::ValueOutOfRange)),
        }
    }
    Ok(rendered.join(" "))
}

/// 6-character uppercase digest of key material, for display and lookup.
pub(crate) fn fingerprint_of(material: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(FINGERPRINT_DOMAIN);
    hasher.update(material);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(6);
    for byte in &digest[..3] {
        out.push_str(&format!("{:02X}", byte));
    }
    out
}

/// Current unix time in seconds, zero if the clock is unreadable.
pub(crate) fn now_ts() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_shape() {
        let fp = fingerprint_of(&[0u8; 32]);
        assert_eq!(fp.len(), 6);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fp, fp.to_uppercase());
    }

    #[test]
    fn test_fingerprint_known_vectors() {
        assert_eq!(fingerprint_of(&[0u8; 32]), "5763B2");
        let counting: Vec<u8> = (0..32).collect();
        assert_eq!(fingerprint_of(&counting), "5DC05A");
    }

    #[test]
    fn test_fingerprint_distinguishes_keys() {
        assert_ne!(fingerprint_of(&[1u8; 32]), fingerprint_of(&[2u8; 32]));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            SeedError::Mnemonic(MnemonicError::InvalidChecksum).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(SeedError::WrongPassword.kind(), ErrorKind::InvalidArgument);
        assert_eq!(SeedError::Encrypted.kind(), ErrorKind::DomainError);
        assert_eq!(
            SeedError::UnsupportedLanguage("xx".into()).kind(),
            ErrorKind::DomainError
        );
    }
}
