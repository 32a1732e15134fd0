//! Language and locale selection.
//!
//! Language is supplied by configuration, never detected. A locale is only
//! meaningful when its language prefix agrees with the active language
//! (`en_US` for `en`); a mismatched locale is dropped rather than passed to
//! the resolver.

use serde::{Deserialize, Serialize};

use crate::schema::{ENGLISH, ENGLISH_US_LOCALE};

/// Active language plus an optional matching locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// ISO 639-1 code.
    pub language: String,
    /// `<lang>_<COUNTRY>` locale, present only if it matches `language`.
    pub locale: Option<String>,
}

impl LanguageConfig {
    /// Build from a language and a candidate locale; the locale is kept
    /// only when its prefix before `_` equals `language`.
    #[must_use]
    pub fn new(language: impl Into<String>, locale: Option<&str>) -> Self {
        let language = language.into().to_lowercase();
        let locale = locale
            .filter(|loc| loc.split('_').next() == Some(language.as_str()))
            .map(str::to_string);
        Self { language, locale }
    }

    /// English with the `en_US` locale.
    #[must_use]
    pub fn english() -> Self {
        Self::new(ENGLISH, Some(ENGLISH_US_LOCALE))
    }

    /// True for English.
    #[must_use]
    pub fn is_english(&self) -> bool {
        self.language == ENGLISH
    }

    /// Locale as a borrowed str.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self::english()
    }
}
