//! 25-word seeds
//!
//! The standard phrase format: 24 data words carrying the 32 key bytes
//! directly, plus one checksum word. This is the only kind that can be
//! minted fresh, either from OS entropy or from caller-supplied recovery
//! data.
//!
//! # Encryption
//!
//! `encrypt` XOR-masks the key bytes with an Argon2id stream and re-encodes
//! the phrase from the masked key, so an encrypted phrase is a perfectly
//! well-formed 25-word phrase — indistinguishable from a plain one, and
//! safe to store or transmit as-is. The flip side is that the scheme has no
//! in-band verifier: a wrong password on `decrypt` is caught exactly for
//! seeds encrypted in this session (an in-memory verifier is recorded by
//! `encrypt`), while a phrase imported as encrypted decrypts unverified —
//! the caller asserted the encrypted state via [`DecodeOpts`], and the
//! scheme cannot check the password for them.

use zeroize::{Zeroize, Zeroizing};

use coldsig_mnemonic::checksum::checksum_index;
use coldsig_mnemonic::{electrum, hash_to_scalar, random_scalar};

use crate::crypto;
use crate::height::ChainClock;
use crate::keystore::KeyStore;
use crate::language::SeedLanguage;
use crate::seed::{fingerprint_of, now_ts, DecodeOpts, Seed, SeedError};
use crate::{Network, SeedType};

const MASK_SALT: &[u8] = b"coldsig/monero-mask/v1";

/// A 25-word seed.
pub struct MoneroSeed {
    values: Zeroizing<Vec<u16>>,
    key: KeyStore,
    network: Network,
    birthday: u64,
    height: u64,
    encrypted: bool,
    pw_check: Option<[u8; 8]>,
    fingerprint: String,
}

impl MoneroSeed {
    /// Words in a 25-word phrase.
    pub const WORDS: usize = 25;

    const DATA_WORDS: usize = 24;

    /// Mint a fresh seed from OS entropy, birthdayed now.
    pub fn generate(network: Network) -> Seed {
        Self::from_key(
            random_scalar(),
            DecodeOpts {
                network,
                birthday: now_ts(),
                ..DecodeOpts::default()
            },
        )
    }

    /// Mint a seed from caller-supplied recovery data: the key is the hash
    /// of `entropy`, not `entropy` itself.
    pub fn create(entropy: &[u8], network: Network, birthday: u64) -> Seed {
        Self::from_key(
            hash_to_scalar(entropy),
            DecodeOpts {
                network,
                birthday,
                ..DecodeOpts::default()
            },
        )
    }

    /// Decode a 25-word phrase under `language`.
    pub fn decode(
        phrase: &str,
        language: &SeedLanguage,
        opts: DecodeOpts,
    ) -> Result<Seed, SeedError> {
        if !language.supported(SeedType::Monero) {
            return Err(SeedError::UnsupportedLanguage(language.code().to_string()));
        }
        let dict = language
            .dictionary()
            .ok_or_else(|| SeedError::UnsupportedLanguage(language.code().to_string()))?;
        let (values, key_bytes) = electrum::parse_phrase(phrase, &dict, Self::DATA_WORDS)?;
        Ok(Self::from_decoded(values, &key_bytes, opts))
    }

    /// Decode an already-numeric 25-element form.
    pub fn decode_values(values: &[u16], opts: DecodeOpts) -> Result<Seed, SeedError> {
        let key_bytes = electrum::decode_values(values, Self::DATA_WORDS)?;
        Ok(Self::from_decoded(values.to_vec(), &key_bytes, opts))
    }

    fn from_key(key: [u8; 32], opts: DecodeOpts) -> Seed {
        let mut values = electrum::encode_bytes(&key);
        values.push(values[checksum_index(&key, Self::DATA_WORDS)]);
        Self::from_decoded(values, &key, opts)
    }

    fn from_decoded(values: Vec<u16>, key_bytes: &[u8], opts: DecodeOpts) -> Seed {
        let mut key = [0u8; 32];
        key.copy_from_slice(key_bytes);
        let fingerprint = fingerprint_of(&key);
        let seed = Self {
            values: Zeroizing::new(values),
            key: KeyStore::from_bytes(key),
            network: opts.network,
            birthday: opts.birthday,
            height: opts.height,
            encrypted: opts.encrypted,
            pw_check: None,
            fingerprint,
        };
        key.zeroize();
        Seed::Monero(seed)
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
        self.encrypted
    }

    /// The secret key; fails while encrypted.
    pub fn key(&self) -> Result<&KeyStore, SeedError> {
        if self.encrypted {
            return Err(SeedError::Encrypted);
        }
        Ok(&self.key)
    }

    pub fn birthday(&self, clock: &dyn ChainClock) -> u64 {
        if self.birthday != 0 {
            return self.birthday;
        }
        clock.timestamp_from_height(self.height, self.network)
    }

    pub fn height(&self, clock: &dyn ChainClock) -> u64 {
        if self.height == 0 && self.birthday != 0 {
            return clock.height_from_timestamp(self.birthday, self.network);
        }
        self.height
    }

    /// Mask the key under `password` and re-encode the phrase.
    pub fn encrypt(&mut self, password: &str) -> Result<(), SeedError> {
        if self.encrypted {
            return Err(SeedError::AlreadyEncrypted);
        }
        crypto::warn_if_weak(password);
        let masked = self.apply_mask(password)?;
        self.replace_key(masked);
        self.encrypted = true;
        self.pw_check = Some(crypto::password_verifier(password));
        // The fingerprint stays the plaintext one: the key was known here.
        Ok(())
    }

    /// Unmask the key under `password` and re-encode the phrase.
    pub fn decrypt(&mut self, password: &str) -> Result<(), SeedError> {
        if !self.encrypted {
            return Err(SeedError::NotEncrypted);
        }
        if let Some(check) = self.pw_check {
            if check != crypto::password_verifier(password) {
                return Err(SeedError::WrongPassword);
            }
        }
        let plain = self.apply_mask(password)?;
        self.replace_key(plain);
        self.encrypted = false;
        self.pw_check = None;
        // Recompute for imports whose fingerprint covered the masked key.
        self.fingerprint = fingerprint_of(self.key.as_bytes());
        Ok(())
    }

    /// XOR the key bytes with the password-derived stream. Involution: the
    /// same call both masks and unmasks.
    fn apply_mask(&self, password: &str) -> Result<Zeroizing<[u8; 32]>, SeedError> {
        let mut mask = Zeroizing::new([0u8; 32]);
        crypto::derive_mask(password, MASK_SALT, &mut *mask)?;
        let mut out = Zeroizing::new(*self.key.as_bytes());
        for (byte, mask_byte) in out.iter_mut().zip(mask.iter()) {
            *byte ^= mask_byte;
        }
        Ok(out)
    }

    fn replace_key(&mut self, key: Zeroizing<[u8; 32]>) {
        let mut values = electrum::encode_bytes(&*key);
        values.push(values[checksum_index(&*key, Self::DATA_WORDS)]);
        self.values = Zeroizing::new(values);
        self.key = KeyStore::from_bytes(*key);
    }
}

impl std::fmt::Debug for MoneroSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoneroSeed")
            .field("fingerprint", &self.fingerprint)
            .field("network", &self.network)
            .field("encrypted", &self.encrypted)
            .finish_non_exhaustive()
    }
}
