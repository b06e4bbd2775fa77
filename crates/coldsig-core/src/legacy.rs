//! Legacy 13-word seeds
//!
//! The deprecated short phrase format: 12 data words carrying 16 bytes of
//! entropy plus one checksum word. Import-only — there is deliberately no
//! generate or create path, so no new wallet is ever minted on 13 words —
//! and no encryption state: a legacy seed is always plaintext.

use zeroize::Zeroizing;

use coldsig_mnemonic::{electrum, hash_to_scalar};

use crate::height::ChainClock;
use crate::keystore::KeyStore;
use crate::language::SeedLanguage;
use crate::seed::{fingerprint_of, DecodeOpts, Seed, SeedError};
use crate::{Network, SeedType};

/// A decoded 13-word seed.
pub struct LegacySeed {
    values: Zeroizing<Vec<u16>>,
    key: KeyStore,
    network: Network,
    birthday: u64,
    height: u64,
    fingerprint: String,
}

impl LegacySeed {
    /// Words in a legacy phrase.
    pub const WORDS: usize = 13;

    const DATA_WORDS: usize = 12;

    /// Decode a 13-word phrase under `language`.
    pub fn decode(
        phrase: &str,
        language: &SeedLanguage,
        opts: DecodeOpts,
    ) -> Result<Seed, SeedError> {
        let dict = supported_dictionary(language)?;
        let (values, entropy) = electrum::parse_phrase(phrase, &dict, Self::DATA_WORDS)?;
        Ok(Self::from_parts(values, &entropy, opts))
    }

    /// Decode an already-numeric 13-element form.
    pub fn decode_values(values: &[u16], opts: DecodeOpts) -> Result<Seed, SeedError> {
        let entropy = electrum::decode_values(values, Self::DATA_WORDS)?;
        Ok(Self::from_parts(values.to_vec(), &entropy, opts))
    }

    fn from_parts(values: Vec<u16>, entropy: &[u8], opts: DecodeOpts) -> Seed {
        // The 16-byte entropy is not itself the key; the key is derived.
        let key = KeyStore::from_bytes(hash_to_scalar(entropy));
        let fingerprint = fingerprint_of(key.as_bytes());
        Seed::Legacy(Self {
            values: Zeroizing::new(values),
            key,
            network: opts.network,
            birthday: opts.birthday,
            height: opts.height,
            fingerprint,
        })
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

    pub fn key(&self) -> &KeyStore {
        &self.key
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
}

impl std::fmt::Debug for LegacySeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacySeed")
            .field("fingerprint", &self.fingerprint)
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}

/// Check `language` supports legacy (Monero-type) phrases and fetch its
/// dictionary.
fn supported_dictionary(
    language: &SeedLanguage,
) -> Result<coldsig_mnemonic::Dictionary, SeedError> {
    if !language.supported(SeedType::Monero) {
        return Err(SeedError::UnsupportedLanguage(language.code().to_string()));
    }
    language
        .dictionary()
        .ok_or_else(|| SeedError::UnsupportedLanguage(language.code().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::height::LinearClock;
    use coldsig_mnemonic::MnemonicError;

    fn english() -> &'static SeedLanguage {
        SeedLanguage::from_code("en").unwrap()
    }

    #[test]
    fn test_decode_zero_entropy_vector() {
        // 16 zero bytes encode as twelve "abandon" plus the checksum word,
        // which for this payload is also "abandon".
        let phrase = ["abandon"; 13].join(" ");
        let seed = LegacySeed::decode(&phrase, english(), DecodeOpts::default()).unwrap();
        assert_eq!(seed.values(), &[0u16; 13]);
        assert_eq!(
            hex::encode(seed.key().unwrap().as_bytes()),
            "5241e14cbd3ad851dcea82183eb31122d2e45e98dd9e820b689bc1c015df870a"
        );
        assert_eq!(seed.fingerprint(), "2723EA");
    }

    #[test]
    fn test_phrase_roundtrip() {
        let phrase = ["abandon"; 13].join(" ");
        let seed = LegacySeed::decode(&phrase, english(), DecodeOpts::default()).unwrap();
        assert_eq!(seed.phrase(english()).unwrap(), phrase);
    }

    #[test]
    fn test_values_roundtrip() {
        let phrase = ["abandon"; 13].join(" ");
        let decoded = LegacySeed::decode(&phrase, english(), DecodeOpts::default()).unwrap();
        let from_values =
            LegacySeed::decode_values(decoded.values(), DecodeOpts::default()).unwrap();
        assert_eq!(decoded.values(), from_values.values());
        assert_eq!(decoded.fingerprint(), from_values.fingerprint());
    }

    #[test]
    fn test_wrong_length_rejected() {
        let short = ["abandon"; 12].join(" ");
        let err = LegacySeed::decode(&short, english(), DecodeOpts::default()).unwrap_err();
        assert_eq!(
            err,
            SeedError::Mnemonic(MnemonicError::InvalidLength {
                expected: 13,
                actual: 12
            })
        );
    }

    #[test]
    fn test_unsupported_language_rejected() {
        let korean = SeedLanguage::from_code("ko").unwrap();
        let phrase = ["abandon"; 13].join(" ");
        let err = LegacySeed::decode(&phrase, korean, DecodeOpts::default()).unwrap_err();
        assert_eq!(err, SeedError::UnsupportedLanguage("ko".to_string()));
    }

    #[test]
    fn test_not_encryptable() {
        let phrase = ["abandon"; 13].join(" ");
        let mut seed = LegacySeed::decode(&phrase, english(), DecodeOpts::default()).unwrap();
        assert!(!seed.encryptable());
        assert!(!seed.encrypted());
        assert_eq!(seed.encrypt("pw").unwrap_err(), SeedError::NotEncryptable);
        assert_eq!(seed.decrypt("pw").unwrap_err(), SeedError::NotEncryptable);
    }

    #[test]
    fn test_birthday_height_duality() {
        let clock = LinearClock;
        let phrase = ["abandon"; 13].join(" ");

        // Only a birthday: height is derived, never stored back.
        let opts = DecodeOpts {
            birthday: 1_397_830_193,
            ..DecodeOpts::default()
        };
        let seed = LegacySeed::decode(&phrase, english(), opts).unwrap();
        assert_eq!(seed.birthday(&clock), 1_397_830_193);
        assert_eq!(seed.height(&clock), 100);

        // Only a height: birthday is derived.
        let opts = DecodeOpts {
            height: 100,
            ..DecodeOpts::default()
        };
        let seed = LegacySeed::decode(&phrase, english(), opts).unwrap();
        assert_eq!(seed.height(&clock), 100);
        assert_eq!(seed.birthday(&clock), 1_397_830_193);
    }
}
