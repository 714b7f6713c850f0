use std::fmt;

use serde::{Deserialize, Serialize};

/// Language declared for a document.
///
/// Serialized as its short code (`fr`, `en`, or whatever code was given).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Language {
    /// French; the default and the fallback for unsupported codes.
    #[default]
    French,
    /// English.
    English,
    /// Any other declared code, lowercased.
    Other(String),
}

impl Language {
    /// Parses a code or a language name (`fr`, `Français`, `english`, ...).
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        if lowered.starts_with("fr") {
            Self::French
        } else if lowered.starts_with("en") {
            Self::English
        } else {
            Self::Other(lowered)
        }
    }

    /// Short code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::French => "fr",
            Self::English => "en",
            Self::Other(code) => code,
        }
    }

    /// Whether the built-in lexicons cover this language.
    #[must_use]
    pub const fn is_builtin(&self) -> bool {
        matches!(self, Self::French | Self::English)
    }

    /// Built-in language whose lexicons stand in for this one.
    #[must_use]
    pub fn lexicon_language(&self) -> Self {
        if self.is_builtin() {
            self.clone()
        } else {
            Self::default()
        }
    }

    /// Compares against a detector's code on the first two letters.
    #[must_use]
    pub fn matches_code(&self, detected: &str) -> bool {
        let ours: String = self.code().chars().take(2).collect();
        let theirs: String = detected.trim().to_lowercase().chars().take(2).collect();
        ours == theirs
    }
}

impl From<String> for Language {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.code().to_string()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_names() {
        assert_eq!(Language::parse("Français"), Language::French);
        assert_eq!(Language::parse("fr"), Language::French);
        assert_eq!(Language::parse(" English "), Language::English);
        assert_eq!(Language::parse("DE"), Language::Other("de".into()));
    }

    #[test]
    fn unsupported_codes_use_french_lexicons() {
        let german = Language::parse("de");
        assert!(!german.is_builtin());
        assert_eq!(german.lexicon_language(), Language::French);
        assert_eq!(Language::English.lexicon_language(), Language::English);
    }

    #[test]
    fn detector_comparison_uses_two_letter_prefix() {
        assert!(Language::French.matches_code("fr"));
        assert!(Language::English.matches_code("en-US"));
        assert!(!Language::French.matches_code("ca"));
    }

    #[test]
    fn round_trips_through_its_code() {
        let json = serde_json::to_string(&Language::English).unwrap();
        assert_eq!(json, "\"en\"");
        let back: Language = serde_json::from_str("\"Français\"").unwrap();
        assert_eq!(back, Language::French);
    }
}
