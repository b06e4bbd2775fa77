//! Seed language catalog
//!
//! A process-wide, immutable registry of the mnemonic dictionaries Coldsig
//! can render phrases in. The catalog is populated exactly once on first
//! access and never changes afterwards, so reads after initialisation are
//! lock-free.
//!
//! Lookups are exact and case-sensitive, and a miss is a hard failure —
//! an unsupported language is never silently substituted with the default.

use std::sync::OnceLock;

use log::debug;
use serde::Serialize;
use thiserror::Error;

use coldsig_mnemonic::Dictionary;

use crate::{ErrorKind, SeedType};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LanguageError {
    #[error("language not found")]
    NotFound,
    #[error("no default language set for seed type")]
    NoDefault,
}

impl LanguageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::OutOfRange,
            Self::NoDefault => ErrorKind::DomainError,
        }
    }
}

/// One mnemonic dictionary in the catalog.
///
/// Identity is the language code alone: two entries never share a code, and
/// equality compares nothing else.
#[derive(Debug, Clone, Serialize)]
pub struct SeedLanguage {
    code: &'static str,
    native_name: &'static str,
    english_name: &'static str,
    monero: bool,
    polyseed: bool,
}

impl PartialEq for SeedLanguage {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for SeedLanguage {}

/// code, native name, English name, Monero support, Polyseed support
const ENTRIES: &[(&str, &str, &str, bool, bool)] = &[
    ("en", "English", "English", true, true),
    ("es", "Español", "Spanish", true, true),
    ("fr", "Français", "French", true, true),
    ("it", "Italiano", "Italian", true, true),
    ("pt", "Português", "Portuguese", true, true),
    ("cs", "Čeština", "Czech", false, true),
    ("ja", "日本語", "Japanese", true, true),
    ("ko", "한국어", "Korean", false, true),
    ("zh-Hans", "简体中文", "Chinese (Simplified)", true, true),
    ("zh-Hant", "繁體中文", "Chinese (Traditional)", false, true),
];

/// code of the default language per seed type
const DEFAULTS: &[(SeedType, &str)] = &[(SeedType::Monero, "en"), (SeedType::Polyseed, "en")];

struct Catalog {
    languages: Vec<SeedLanguage>,
}

static CATALOG: OnceLock<Catalog> = OnceLock::new();

fn catalog() -> &'static Catalog {
    CATALOG.get_or_init(|| {
        let languages: Vec<SeedLanguage> = ENTRIES
            .iter()
            .map(|&(code, native_name, english_name, monero, polyseed)| SeedLanguage {
                code,
                native_name,
                english_name,
                monero,
                polyseed,
            })
            .collect();
        debug!("seed language catalog initialised: {} entries", languages.len());
        Catalog { languages }
    })
}

impl SeedLanguage {
    /// Two-letter code, optionally with a script suffix (`zh-Hans`).
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Name of the language in the language itself.
    pub fn native_name(&self) -> &'static str {
        self.native_name
    }

    /// Name of the language in English.
    pub fn english_name(&self) -> &'static str {
        self.english_name
    }

    /// Whether phrases of `seed_type` can be rendered in this language.
    pub fn supported(&self, seed_type: SeedType) -> bool {
        match seed_type {
            SeedType::Monero => self.monero,
            SeedType::Polyseed => self.polyseed,
        }
    }

    /// Whether this language is the designated default for `seed_type`.
    pub fn is_default(&self, seed_type: SeedType) -> bool {
        DEFAULTS
            .iter()
            .any(|&(t, code)| t == seed_type && code == self.code)
    }

    /// The word list behind this catalog entry.
    pub(crate) fn dictionary(&self) -> Option<Dictionary> {
        Dictionary::from_code(self.code)
    }

    /// The full catalog, in a fixed order.
    pub fn list() -> &'static [SeedLanguage] {
        &catalog().languages
    }

    /// Catalog entries supporting `seed_type`, in catalog order.
    pub fn list_for(seed_type: SeedType) -> Vec<&'static SeedLanguage> {
        Self::list()
            .iter()
            .filter(|l| l.supported(seed_type))
            .collect()
    }

    /// Look up a language by its native name.
    pub fn from_name(name: &str) -> Result<&'static SeedLanguage, LanguageError> {
        Self::list()
            .iter()
            .find(|l| l.native_name == name)
            .ok_or(LanguageError::NotFound)
    }

    /// Look up a language by its English name.
    pub fn from_english_name(name: &str) -> Result<&'static SeedLanguage, LanguageError> {
        Self::list()
            .iter()
            .find(|l| l.english_name == name)
            .ok_or(LanguageError::NotFound)
    }

    /// Look up a language by code.
    pub fn from_code(code: &str) -> Result<&'static SeedLanguage, LanguageError> {
        Self::list()
            .iter()
            .find(|l| l.code == code)
            .ok_or(LanguageError::NotFound)
    }

    /// The default language for `seed_type`.
    pub fn default_language(seed_type: SeedType) -> Result<&'static SeedLanguage, LanguageError> {
        let code = DEFAULTS
            .iter()
            .find(|&&(t, _)| t == seed_type)
            .map(|&(_, code)| code)
            .ok_or(LanguageError::NoDefault)?;
        Self::from_code(code).map_err(|_| LanguageError::NoDefault)
    }
}
