use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::DiscourseError;

/// Disfluencies of transcribed speech stripped before tokenization.
pub const ORAL_ARTIFACTS: &[&str] = &[
    "euh", "heu", "hum", "ah", "bon", "voilà", "donc", "alors", "hein", "ben", "bah",
];

static NOISE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s.?!]").expect("noise pattern"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Cleans raw speech: artifacts out, punctuation other than `. ? !` to
/// spaces, whitespace collapsed, lowercased. Idempotent.
#[derive(Debug, Clone)]
pub struct LexicalNormalizer {
    artifacts: Option<Regex>,
}

impl LexicalNormalizer {
    /// Builds a normalizer stripping the given whole-word artifacts,
    /// case-insensitively.
    pub fn new<I, S>(artifacts: I) -> Result<Self, DiscourseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives: Vec<String> = artifacts
            .into_iter()
            .map(|artifact| artifact.as_ref().trim().to_lowercase())
            .filter(|artifact| !artifact.is_empty())
            .map(|artifact| regex::escape(&artifact))
            .collect();
        if alternatives.is_empty() {
            return Ok(Self { artifacts: None });
        }
        let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
        let artifacts = Regex::new(&pattern)
            .map_err(|err| DiscourseError::InvalidConfig(format!("oral artifacts: {err}")))?;
        Ok(Self {
            artifacts: Some(artifacts),
        })
    }

    /// Built-in artifacts plus `extra`.
    pub fn with_extra(extra: &[String]) -> Result<Self, DiscourseError> {
        Self::new(
            ORAL_ARTIFACTS
                .iter()
                .map(|artifact| (*artifact).to_string())
                .chain(extra.iter().cloned()),
        )
    }

    /// Normalizes `text`. Empty input yields empty output.
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        let stripped = match &self.artifacts {
            Some(artifacts) => artifacts.replace_all(text, ""),
            None => text.into(),
        };
        let denoised = NOISE_RE.replace_all(&stripped, " ");
        WHITESPACE_RE
            .replace_all(&denoised, " ")
            .trim()
            .to_lowercase()
    }
}

impl Default for LexicalNormalizer {
    fn default() -> Self {
        // The built-in list only holds plain words, so the pattern always compiles.
        Self::with_extra(&[]).unwrap_or(Self { artifacts: None })
    }
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_artifacts_and_noise() {
        let normalizer = LexicalNormalizer::default();
        let result = normalizer.normalize("Euh, le PEUPLE — voilà — veut\n\n(la) paix !");
        assert_eq!(result, "le peuple veut la paix !");
    }

    #[test]
    fn keeps_sentence_punctuation_and_word_internal_artifacts() {
        let normalizer = LexicalNormalizer::default();
        assert_eq!(normalizer.normalize("Bonjour. Ahmed? Bon!"), "bonjour. ahmed? !");
    }

    #[test]
    fn normalization_is_idempotent() {
        let normalizer = LexicalNormalizer::default();
        for raw in [
            "",
            "   ",
            "Alors, euh... nous   allons AGIR; l'avenir: c'est maintenant!",
            "Ben — hein — « la France » (et l'Europe) ?",
        ] {
            let once = normalizer.normalize(raw);
            assert_eq!(normalizer.normalize(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn extra_artifacts_extend_the_list() {
        let normalizer = LexicalNormalizer::with_extra(&["um".into()]).unwrap();
        assert_eq!(normalizer.normalize("Um, euh, we act"), "we act");
        let bare = LexicalNormalizer::new(Vec::<String>::new()).unwrap();
        assert_eq!(bare.normalize("Euh  ok"), "euh ok");
    }

    #[test]
    fn excerpt_truncates_on_char_boundaries() {
        assert_eq!(excerpt("short", 150), "short");
        assert_eq!(excerpt("été chaud", 3), "été...");
        let long = "a".repeat(151);
        assert_eq!(excerpt(&long, 150).chars().count(), 153);
        assert_eq!(excerpt(&"a".repeat(150), 150), "a".repeat(150));
    }
}
