//! Language dictionaries
//!
//! Thin wrapper over the BIP-39 word lists. Each dictionary is a fixed,
//! ordered list of 2048 words; a word's position in the list is its numeric
//! index, and that numeric form is what the custody core stores.
//!
//! Lookup is exact and case-sensitive. No trimming, no prefix matching, no
//! Unicode normalisation — a word either is in the list or it is not.

use bip39::Language;

/// Number of words in every dictionary.
pub const DICTIONARY_SIZE: usize = 2048;

/// One mnemonic dictionary, identified by its language code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dictionary {
    language: Language,
}

impl Dictionary {
    /// Look up a dictionary by language code.
    ///
    /// Returns `None` for codes without a word list.
    pub fn from_code(code: &str) -> Option<Self> {
        let language = match code {
            "en" => Language::English,
            "es" => Language::Spanish,
            "fr" => Language::French,
            "it" => Language::Italian,
            "pt" => Language::Portuguese,
            "cs" => Language::Czech,
            "ja" => Language::Japanese,
            "ko" => Language::Korean,
            "zh-Hans" => Language::SimplifiedChinese,
            "zh-Hant" => Language::TraditionalChinese,
            _ => return None,
        };
        Some(Self { language })
    }

    /// The full word list, in index order.
    pub fn words(&self) -> &'static [&'static str] {
        // An empty prefix matches every word in the list.
        self.language.words_by_prefix("")
    }

    /// The word at `index`, or `None` past the end of the list.
    pub fn word(&self, index: u16) -> Option<&'static str> {
        self.words().get(index as usize).copied()
    }

    /// The index of `word`, by exact match.
    pub fn index_of(&self, word: &str) -> Option<u16> {
        self.words()
            .iter()
            .position(|w| *w == word)
            .map(|i| i as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_resolve() {
        for code in [
            "en", "es", "fr", "it", "pt", "cs", "ja", "ko", "zh-Hans", "zh-Hant",
        ] {
            let dict = Dictionary::from_code(code);
            assert!(dict.is_some(), "code '{}' should have a dictionary", code);
            assert_eq!(dict.unwrap().words().len(), DICTIONARY_SIZE);
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert!(Dictionary::from_code("xx").is_none());
        assert!(Dictionary::from_code("EN").is_none());
        assert!(Dictionary::from_code("").is_none());
    }

    #[test]
    fn test_index_word_roundtrip() {
        let dict = Dictionary::from_code("en").unwrap();
        assert_eq!(dict.word(0), Some("abandon"));
        assert_eq!(dict.index_of("abandon"), Some(0));

        for index in [1u16, 17, 255, 1024, 2047] {
            let word = dict.word(index).unwrap();
            assert_eq!(dict.index_of(word), Some(index));
        }
        assert_eq!(dict.word(2048), None);
    }

    #[test]
    fn test_lookup_is_exact() {
        let dict = Dictionary::from_code("en").unwrap();
        assert_eq!(dict.index_of("Abandon"), None);
        assert_eq!(dict.index_of(" abandon"), None);
        assert_eq!(dict.index_of("abandonn"), None);
        assert_eq!(dict.index_of(""), None);
    }

    #[test]
    fn test_dictionaries_differ_by_language() {
        let en = Dictionary::from_code("en").unwrap();
        let es = Dictionary::from_code("es").unwrap();
        assert_ne!(en.word(0), es.word(0));
    }
}
