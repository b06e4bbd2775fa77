//! Base-2048 word codec
//!
//! Encodes raw bytes as mnemonic words, four bytes per three words, with the
//! chained-offset scheme: for each little-endian 32-bit group `x`,
//!
//! ```text
//! w1 = x % 2048
//! w2 = (x / 2048 + w1) % 2048
//! w3 = (x / 2048² + w2) % 2048
//! ```
//!
//! Three 11-bit words carry 33 bits, one more than a group holds, so decode
//! must reject recovered values above `u32::MAX` — otherwise a transcription
//! error in the last word of a group can silently alias another phrase.
//!
//! A phrase is the data words followed by one checksum word: a duplicate of
//! the data word selected by [`checksum::checksum_index`] over the payload
//! bytes. The selection is language-independent, so re-rendering a phrase in
//! another dictionary never invalidates it.

use crate::checksum::checksum_index;
use crate::dictionary::{Dictionary, DICTIONARY_SIZE};
use crate::MnemonicError;

/// Bytes per word group.
pub const GROUP_BYTES: usize = 4;

/// Words per group.
pub const WORDS_PER_GROUP: usize = 3;

const BASE: u64 = DICTIONARY_SIZE as u64;

/// Encode bytes into word indices. `data` must be a multiple of four bytes.
pub fn encode_bytes(data: &[u8]) -> Vec<u16> {
    debug_assert_eq!(data.len() % GROUP_BYTES, 0);
    let mut words = Vec::with_capacity(data.len() / GROUP_BYTES * WORDS_PER_GROUP);
    for group in data.chunks_exact(GROUP_BYTES) {
        let x = u32::from_le_bytes([group[0], group[1], group[2], group[3]]) as u64;
        let w1 = x % BASE;
        let w2 = (x / BASE + w1) % BASE;
        let w3 = (x / (BASE * BASE) + w2) % BASE;
        words.push(w1 as u16);
        words.push(w2 as u16);
        words.push(w3 as u16);
    }
    words
}

/// Decode word indices back into bytes. `words` must be a multiple of three
/// indices; fails with `ValueOutOfRange` on an index past the dictionary or
/// a group decoding above 32 bits.
pub fn decode_words(words: &[u16]) -> Result<Vec<u8>, MnemonicError> {
    debug_assert_eq!(words.len() % WORDS_PER_GROUP, 0);
    if words.iter().any(|&w| w as usize >= DICTIONARY_SIZE) {
        return Err(MnemonicError::ValueOutOfRange);
    }
    let mut data = Vec::with_capacity(words.len() / WORDS_PER_GROUP * GROUP_BYTES);
    for group in words.chunks_exact(WORDS_PER_GROUP) {
        let (w1, w2, w3) = (group[0] as u64, group[1] as u64, group[2] as u64);
        let x = w1
            + BASE * ((w2 + BASE - w1) % BASE)
            + BASE * BASE * ((w3 + BASE - w2) % BASE);
        if x > u32::MAX as u64 {
            return Err(MnemonicError::ValueOutOfRange);
        }
        data.extend_from_slice(&(x as u32).to_le_bytes());
    }
    Ok(data)
}

/// Encode bytes into a phrase: data words plus the trailing checksum word.
///
/// Returns the full numeric form (checksum word included) and the rendered
/// phrase in `dict`'s language.
pub fn encode_phrase(data: &[u8], dict: &Dictionary) -> (Vec<u16>, String) {
    let mut values = encode_bytes(data);
    let index = checksum_index(data, values.len());
    values.push(values[index]);
    let words = dict.words();
    let phrase = values
        .iter()
        .map(|&v| words[v as usize])
        .collect::<Vec<_>>()
        .join(" ");
    (values, phrase)
}

/// Parse a phrase of `data_words + 1` words under `dict`.
///
/// Splits on Unicode whitespace, maps every word to its index (failing on
/// the first word outside the dictionary), decodes the payload and validates
/// the trailing checksum word. Returns the numeric form and the payload
/// bytes.
pub fn parse_phrase(
    phrase: &str,
    dict: &Dictionary,
    data_words: usize,
) -> Result<(Vec<u16>, Vec<u8>), MnemonicError> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.len() != data_words + 1 {
        return Err(MnemonicError::InvalidLength {
            expected: data_words + 1,
            actual: words.len(),
        });
    }
    let mut values = Vec::with_capacity(words.len());
    for word in &words {
        match dict.index_of(word) {
            Some(index) => values.push(index),
            None => return Err(MnemonicError::InvalidWord((*word).to_string())),
        }
    }
    let data = decode_words(&values[..data_words])?;
    if values[data_words] != values[checksum_index(&data, data_words)] {
        return Err(MnemonicError::InvalidChecksum);
    }
    Ok((values, data))
}

/// Decode an already-numeric phrase of `data_words + 1` indices.
///
/// The dictionary step is skipped; length, range and checksum are still
/// validated.
pub fn decode_values(values: &[u16], data_words: usize) -> Result<Vec<u8>, MnemonicError> {
    if values.len() != data_words + 1 {
        return Err(MnemonicError::InvalidLength {
            expected: data_words + 1,
            actual: values.len(),
        });
    }
    if values.iter().any(|&v| v as usize >= DICTIONARY_SIZE) {
        return Err(MnemonicError::ValueOutOfRange);
    }
    let data = decode_words(&values[..data_words])?;
    if values[data_words] != values[checksum_index(&data, data_words)] {
        return Err(MnemonicError::InvalidChecksum);
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> Dictionary {
        Dictionary::from_code("en").unwrap()
    }

    #[test]
    fn test_zero_key_is_all_abandon() {
        let (values, phrase) = encode_phrase(&[0u8; 32], &en());
        assert_eq!(values, vec![0u16; 25]);
        assert_eq!(phrase, ["abandon"; 25].join(" "));
    }

    #[test]
    fn test_counting_key_values() {
        let key: Vec<u8> = (0..32).collect();
        let (values, _) = encode_phrase(&key, &en());
        let expected: Vec<u16> = vec![
            256, 320, 332, 1284, 1476, 1504, 264, 585, 629, 1292, 1741, 1801, 272, 850, 926,
            1300, 2006, 50, 280, 1115, 1223, 1308, 223, 347,
        ];
        assert_eq!(&values[..24], &expected[..]);
        // CRC32 of the counting key selects data word 18 as the checksum.
        assert_eq!(values[24], expected[18]);
    }

    #[test]
    fn test_phrase_roundtrip() {
        let key: Vec<u8> = (0..32).map(|i| i * 7 + 3).collect();
        let (values, phrase) = encode_phrase(&key, &en());
        let (parsed, data) = parse_phrase(&phrase, &en(), 24).unwrap();
        assert_eq!(parsed, values);
        assert_eq!(data, key);
    }

    #[test]
    fn test_roundtrip_other_languages() {
        let key: Vec<u8> = (0..32).map(|i| 251 - i * 3).collect();
        for code in ["es", "fr", "ja", "zh-Hans"] {
            let dict = Dictionary::from_code(code).unwrap();
            let (values, phrase) = encode_phrase(&key, &dict);
            let (parsed, data) = parse_phrase(&phrase, &dict, 24).unwrap();
            assert_eq!(parsed, values, "language {}", code);
            assert_eq!(data, key, "language {}", code);
        }
    }

    #[test]
    fn test_unknown_word_rejected() {
        let mut words: Vec<&str> = vec!["abandon"; 25];
        words[3] = "notaword";
        let err = parse_phrase(&words.join(" "), &en(), 24).unwrap_err();
        assert_eq!(err, MnemonicError::InvalidWord("notaword".to_string()));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let short = ["abandon"; 24].join(" ");
        assert_eq!(
            parse_phrase(&short, &en(), 24).unwrap_err(),
            MnemonicError::InvalidLength {
                expected: 25,
                actual: 24
            }
        );
    }

    #[test]
    fn test_corrupt_checksum_rejected() {
        let key: Vec<u8> = (0..32).collect();
        let (_, phrase) = encode_phrase(&key, &en());
        let mut words: Vec<&str> = phrase.split_whitespace().collect();
        // Swap the checksum word for any phrase word that differs from it.
        let replacement = words[..24]
            .iter()
            .find(|w| **w != words[24])
            .copied()
            .unwrap();
        words[24] = replacement;
        assert_eq!(
            parse_phrase(&words.join(" "), &en(), 24).unwrap_err(),
            MnemonicError::InvalidChecksum
        );
    }

    #[test]
    fn test_group_overflow_rejected() {
        // 0 + 0 + 1024·2048² decodes to exactly 2^32, one past u32::MAX.
        assert_eq!(
            decode_words(&[0, 0, 1024]).unwrap_err(),
            MnemonicError::ValueOutOfRange
        );
        // The all-max group stays in range (chained offsets cancel).
        assert!(decode_words(&[2047, 2047, 2047]).is_ok());
    }

    #[test]
    fn test_decode_values_checks() {
        let key = [9u8; 32];
        let (values, _) = encode_phrase(&key, &en());
        assert_eq!(decode_values(&values, 24).unwrap(), key);

        let counting: Vec<u8> = (0..32).collect();
        let (mut values, _) = encode_phrase(&counting, &en());
        values[24] ^= 1;
        assert_eq!(
            decode_values(&values, 24).unwrap_err(),
            MnemonicError::InvalidChecksum
        );

        assert_eq!(
            decode_values(&values[..24], 24).unwrap_err(),
            MnemonicError::InvalidLength {
                expected: 25,
                actual: 24
            }
        );
    }

    #[test]
    fn test_encode_decode_words_inverse() {
        for data in [vec![0u8; 16], (0..16).collect(), vec![0xFF; 16]] {
            let words = encode_bytes(&data);
            assert_eq!(words.len(), 12);
            assert_eq!(decode_words(&words).unwrap(), data);
        }
    }
}
