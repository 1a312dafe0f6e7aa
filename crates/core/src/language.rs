//! Static catalog of supported target languages.
//!
//! The catalog is read-only reference data. Adding a language means adding
//! an entry to [`LANGUAGES`]; there is no dynamic source.

use serde::Serialize;

/// A supported target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    /// Short ISO-like identifier sent to the backend (e.g. `es`).
    pub code: &'static str,
    /// Human-readable name for display.
    pub name: &'static str,
}

/// Every language the backend is asked to translate into.
pub const LANGUAGES: [Language; 5] = [
    Language { code: "es", name: "Spanish" },
    Language { code: "fr", name: "French" },
    Language { code: "de", name: "German" },
    Language { code: "ja", name: "Japanese" },
    Language { code: "zh", name: "Chinese" },
];

/// Language selected before the user picks one.
pub const DEFAULT_LANGUAGE_CODE: &str = "es";

/// Look up a catalog entry by code (exact match).
pub fn find_language(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|lang| lang.code == code)
}

/// Whether `code` names a catalog entry.
pub fn is_supported(code: &str) -> bool {
    find_language(code).is_some()
}
