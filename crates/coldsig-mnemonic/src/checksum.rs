//! CRC helpers for the phrase codecs
//!
//! Both phrase layouts protect against transcription errors with a CRC32
//! over the data they encode, not over the rendered words, so a checksum
//! survives re-encoding into another language unchanged.

/// Index of the data word to duplicate as the trailing checksum word.
///
/// Computed over the raw payload bytes, then reduced modulo the data word
/// count, so the selected position is language-independent.
pub fn checksum_index(data: &[u8], word_count: usize) -> usize {
    debug_assert!(word_count > 0);
    crc32fast::hash(data) as usize % word_count
}

/// 11-bit checksum over a sequence of word indices.
///
/// Each index contributes its big-endian byte pair; the CRC is truncated to
/// the low 11 bits so it fits a single word position.
pub fn word_checksum(words: &[u16]) -> u16 {
    let mut hasher = crc32fast::Hasher::new();
    for &word in words {
        hasher.update(&word.to_be_bytes());
    }
    (hasher.finalize() & 0x7FF) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_index_in_range() {
        for len in [12usize, 24] {
            for data in [vec![0u8; len], (0..len as u8).collect()] {
                let index = checksum_index(&data, len);
                assert!(index < len);
            }
        }
    }

    #[test]
    fn test_checksum_index_known_values() {
        // CRC32 of 32 zero bytes mod 24, and of 16 zero bytes mod 12.
        assert_eq!(checksum_index(&[0u8; 32], 24), 5);
        assert_eq!(checksum_index(&[0u8; 16], 12), 1);
        let counting: Vec<u8> = (0..32).collect();
        assert_eq!(checksum_index(&counting, 24), 18);
    }

    #[test]
    fn test_word_checksum_known_values() {
        assert_eq!(word_checksum(&[0u16; 15]), 1717);
        let mut words = [0u16; 15];
        words[0] = 48;
        assert_eq!(word_checksum(&words), 2043);
    }

    #[test]
    fn test_word_checksum_detects_single_word_change() {
        let words = [7u16, 100, 2047, 0, 13];
        let reference = word_checksum(&words);
        for i in 0..words.len() {
            let mut altered = words;
            altered[i] ^= 1;
            assert_ne!(word_checksum(&altered), reference, "word {} flip", i);
        }
    }
}
