//! 16-word seeds with an embedded birthday
//!
//! Word 0 carries an 11-bit checksum; the remaining 15 words are a 165-bit
//! payload:
//!
//! ```text
//! birthday (10 bits) ‖ features (5 bits) ‖ secret (150 bits)
//! ```
//!
//! The birthday is quantised to months since the format epoch (2021-11-01),
//! so unlike the 25-word kinds it is exact by construction and always set.
//! Feature bit 0 marks the encrypted state in-band; the remaining feature
//! bits are reserved and must be zero.
//!
//! # Encryption
//!
//! `encrypt` XOR-masks only the 150 secret bits; birthday and features stay
//! readable, and the feature bit flips so an encrypted phrase announces
//! itself. The checksum word always covers the *plaintext* payload: decode
//! of an encrypted phrase checks structure only, and `decrypt` re-derives
//! the plaintext payload and validates it against the stored checksum — a
//! wrong password fails closed even for imported phrases, with a 2⁻¹¹
//! false-accept floor on par with mnemonic checksums generally.

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use coldsig_mnemonic::bits::{BitReader, BitWriter};
use coldsig_mnemonic::checksum::word_checksum;
use coldsig_mnemonic::dictionary::DICTIONARY_SIZE;
use coldsig_mnemonic::{hash_to_scalar_tagged, MnemonicError};

use crate::crypto;
use crate::height::ChainClock;
use crate::keystore::KeyStore;
use crate::language::SeedLanguage;
use crate::seed::{fingerprint_of, DecodeOpts, Seed, SeedError};
use crate::{Network, SeedType};

/// Format epoch: 2021-11-01 00:00:00 UTC.
const EPOCH: u64 = 1_635_768_000;

/// Average Gregorian month, the birthday quantum.
const SECONDS_PER_MONTH: u64 = 2_629_746;

/// Safety margin subtracted before height estimation: the birthday is
/// exact, but the chain clock is not.
const HEIGHT_MARGIN: u64 = 30 * 86_400;

const KEY_DOMAIN: &[u8] = b"coldsig/polyseed-key/v1";
const MASK_SALT: &[u8] = b"coldsig/polyseed-mask/v1";

const SECRET_BYTES: usize = 19;
const PAYLOAD_WORDS: usize = 15;

const FEATURE_ENCRYPTED: u8 = 0b00001;
const FEATURE_RESERVED: u8 = 0b11110;

/// A 16-word seed.
pub struct Polyseed {
    values: Zeroizing<Vec<u16>>,
    secret: Zeroizing<[u8; SECRET_BYTES]>,
    key: KeyStore,
    network: Network,
    birthday_months: u16,
    features: u8,
    height: u64,
    pw_check: Option<[u8; 8]>,
    fingerprint: String,
}

impl Polyseed {
    /// Words in a 16-word phrase.
    pub const WORDS: usize = 16;

    /// Mint a fresh seed from OS entropy, birthdayed at `timestamp`.
    pub fn create(network: Network, timestamp: u64) -> Seed {
        let mut secret = Zeroizing::new([0u8; SECRET_BYTES]);
        OsRng.fill_bytes(secret.as_mut_slice());
        // Only 150 of the 152 bits are part of the format.
        secret[SECRET_BYTES - 1] &= 0xFC;

        let birthday_months = birthday_field(timestamp);
        let payload = pack_payload(birthday_months, 0, &secret);
        let mut values = Vec::with_capacity(Self::WORDS);
        values.push(word_checksum(&payload));
        values.extend_from_slice(&payload);

        let key = KeyStore::from_bytes(hash_to_scalar_tagged(KEY_DOMAIN, &*secret));
        let fingerprint = fingerprint_of(key.as_bytes());
        Seed::Polyseed(Self {
            values: Zeroizing::new(values),
            secret,
            key,
            network,
            birthday_months,
            features: 0,
            height: 0,
            pw_check: None,
            fingerprint,
        })
    }

    /// Decode a 16-word phrase under `language`. The encrypted state is
    /// detected from the feature bits, not from the caller.
    pub fn decode(
        phrase: &str,
        language: &SeedLanguage,
        opts: DecodeOpts,
    ) -> Result<Seed, SeedError> {
        if !language.supported(SeedType::Polyseed) {
            return Err(SeedError::UnsupportedLanguage(language.code().to_string()));
        }
        let dict = language
            .dictionary()
            .ok_or_else(|| SeedError::UnsupportedLanguage(language.code().to_string()))?;
        let words: Vec<&str> = phrase.split_whitespace().collect();
        if words.len() != Self::WORDS {
            return Err(SeedError::Mnemonic(MnemonicError::InvalidLength {
                expected: Self::WORDS,
                actual: words.len(),
            }));
        }
        let mut values = Vec::with_capacity(Self::WORDS);
        for word in &words {
            match dict.index_of(word) {
                Some(index) => values.push(index),
                None => {
                    return Err(SeedError::Mnemonic(MnemonicError::InvalidWord(
                        (*word).to_string(),
                    )))
                }
            }
        }
        Self::decode_values(&values, opts)
    }

    /// Decode an already-numeric 16-element form.
    pub fn decode_values(values: &[u16], opts: DecodeOpts) -> Result<Seed, SeedError> {
        if values.len() != Self::WORDS {
            return Err(SeedError::Mnemonic(MnemonicError::InvalidLength {
                expected: Self::WORDS,
                actual: values.len(),
            }));
        }
        if values.iter().any(|&v| v as usize >= DICTIONARY_SIZE) {
            return Err(SeedError::Mnemonic(MnemonicError::ValueOutOfRange));
        }
        let payload = &values[1..];
        let (birthday_months, features, secret) = unpack_payload(payload)?;
        if features & FEATURE_RESERVED != 0 {
            return Err(SeedError::ReservedFeatures);
        }
        let encrypted = features & FEATURE_ENCRYPTED != 0;
        if !encrypted && values[0] != word_checksum(payload) {
            return Err(SeedError::Mnemonic(MnemonicError::InvalidChecksum));
        }

        // While encrypted, the key stays a zero placeholder and the
        // fingerprint covers the masked secret; the plaintext is
        // unknowable before decrypt.
        let (key, fingerprint) = if encrypted {
            (KeyStore::default(), fingerprint_of(&*secret))
        } else {
            let key = KeyStore::from_bytes(hash_to_scalar_tagged(KEY_DOMAIN, &*secret));
            let fingerprint = fingerprint_of(key.as_bytes());
            (key, fingerprint)
        };
        Ok(Seed::Polyseed(Self {
            values: Zeroizing::new(values.to_vec()),
            secret,
            key,
            network: opts.network,
            birthday_months,
            features,
            height: opts.height,
            pw_check: None,
            fingerprint,
        }))
    }

    pub fn values(&self) -> &[u16] {
        &self.values
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn encrypted(&self) -> bool {
        self.features & FEATURE_ENCRYPTED != 0
    }

    /// The secret key; fails while encrypted.
    pub fn key(&self) -> Result<&KeyStore, SeedError> {
        if self.encrypted() {
            return Err(SeedError::Encrypted);
        }
        Ok(&self.key)
    }

    /// The embedded birthday, quantised to the format's month grid. Always
    /// set — no chain clock needed.
    pub fn birthday(&self) -> u64 {
        EPOCH + self.birthday_months as u64 * SECONDS_PER_MONTH
    }

    /// Restore height: explicit if supplied at decode, otherwise estimated
    /// from the birthday less the 30-day safety margin.
    pub fn height(&self, clock: &dyn ChainClock) -> u64 {
        if self.height != 0 {
            return self.height;
        }
        clock.height_from_timestamp(self.birthday().saturating_sub(HEIGHT_MARGIN), self.network)
    }

    /// Mask the secret bits under `password` and set the encrypted feature
    /// bit. The checksum word keeps covering the plaintext payload.
    pub fn encrypt(&mut self, password: &str) -> Result<(), SeedError> {
        if self.encrypted() {
            return Err(SeedError::AlreadyEncrypted);
        }
        crypto::warn_if_weak(password);
        let masked = self.apply_mask(password)?;
        self.secret = masked;
        self.features |= FEATURE_ENCRYPTED;
        self.rebuild_payload();
        self.key = KeyStore::default();
        self.pw_check = Some(crypto::password_verifier(password));
        // The fingerprint stays the plaintext one: the key was known here.
        Ok(())
    }

    /// Unmask the secret bits under `password`, validating the candidate
    /// plaintext against the stored checksum. Fails closed.
    pub fn decrypt(&mut self, password: &str) -> Result<(), SeedError> {
        if !self.encrypted() {
            return Err(SeedError::NotEncrypted);
        }
        if let Some(check) = self.pw_check {
            if check != crypto::password_verifier(password) {
                return Err(SeedError::WrongPassword);
            }
        }
        let candidate = self.apply_mask(password)?;
        let plain_payload = pack_payload(
            self.birthday_months,
            self.features & !FEATURE_ENCRYPTED,
            &candidate,
        );
        if self.values[0] != word_checksum(&plain_payload) {
            return Err(SeedError::WrongPassword);
        }
        self.secret = candidate;
        self.features &= !FEATURE_ENCRYPTED;
        self.rebuild_payload();
        self.key = KeyStore::from_bytes(hash_to_scalar_tagged(KEY_DOMAIN, &*self.secret));
        self.fingerprint = fingerprint_of(self.key.as_bytes());
        self.pw_check = None;
        Ok(())
    }

    /// XOR the secret with the password-derived stream, leaving the two
    /// padding bits clear. Involution.
    fn apply_mask(&self, password: &str) -> Result<Zeroizing<[u8; SECRET_BYTES]>, SeedError> {
        let mut mask = Zeroizing::new([0u8; SECRET_BYTES]);
        crypto::derive_mask(password, MASK_SALT, &mut *mask)?;
        mask[SECRET_BYTES - 1] &= 0xFC;
        let mut out = Zeroizing::new(*self.secret);
        for (byte, mask_byte) in out.iter_mut().zip(mask.iter()) {
            *byte ^= mask_byte;
        }
        Ok(out)
    }

    /// Re-encode words 1..16 from the current fields; word 0 is untouched.
    fn rebuild_payload(&mut self) {
        let payload = pack_payload(self.birthday_months, self.features, &self.secret);
        self.values.truncate(1);
        self.values.extend_from_slice(&payload);
    }
}

impl std::fmt::Debug for Polyseed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Polyseed")
            .field("fingerprint", &self.fingerprint)
            .field("network", &self.network)
            .field("encrypted", &self.encrypted())
            .finish_non_exhaustive()
    }
}

/// Months since the epoch, clamped to the 10-bit field.
fn birthday_field(timestamp: u64) -> u16 {
    let months = timestamp.saturating_sub(EPOCH) / SECONDS_PER_MONTH;
    months.min(0x3FF) as u16
}

fn pack_payload(
    birthday_months: u16,
    features: u8,
    secret: &[u8; SECRET_BYTES],
) -> Vec<u16> {
    let mut writer = BitWriter::new();
    writer.write(birthday_months as u32, 10);
    writer.write(features as u32, 5);
    for &byte in &secret[..SECRET_BYTES - 1] {
        writer.write(byte as u32, 8);
    }
    writer.write((secret[SECRET_BYTES - 1] >> 2) as u32, 6);
    writer.into_chunks(11)
}

fn unpack_payload(
    payload: &[u16],
) -> Result<(u16, u8, Zeroizing<[u8; SECRET_BYTES]>), SeedError> {
    debug_assert_eq!(payload.len(), PAYLOAD_WORDS);
    let mut reader = BitReader::from_chunks(payload, 11);
    let birthday_months = reader.read(10).map_err(SeedError::Mnemonic)? as u16;
    let features = reader.read(5).map_err(SeedError::Mnemonic)? as u8;
    let mut secret = Zeroizing::new([0u8; SECRET_BYTES]);
    for byte in secret.iter_mut().take(SECRET_BYTES - 1) {
        *byte = reader.read(8).map_err(SeedError::Mnemonic)? as u8;
    }
    secret[SECRET_BYTES - 1] = (reader.read(6).map_err(SeedError::Mnemonic)? as u8) << 2;
    Ok((birthday_months, features, secret))
}
