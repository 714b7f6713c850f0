use std::collections::HashSet;

use crate::{
    error::DiscourseError,
    language::Language,
    providers::{
        lexicon::{stopwords, WORD_RE},
        AnnotatedToken, TokenAnnotator,
    },
};

const ELIDED_PREFIXES: &[&str] = &["qu", "l", "d", "j", "n", "s", "c", "m", "t"];

/// Stopword-list annotator. Lemmas are lowercase surface forms with French
/// elisions (`l'`, `qu'`, ...) removed; there is no morphological analysis.
///
/// Text coming out of [`LexicalNormalizer`](crate::helper::LexicalNormalizer)
/// has its apostrophes spaced out already, so elisions only reach the
/// stripping below when raw text is annotated directly. On the normalized
/// path the leftover fragments (`aujourd`, `don`, ...) are stopwords.
#[derive(Debug, Clone, Default)]
pub struct LexiconAnnotator {
    extra_stopwords: HashSet<String>,
}

impl LexiconAnnotator {
    /// Annotator that also flags `extra_stopwords`.
    #[must_use]
    pub fn new(extra_stopwords: &[String]) -> Self {
        Self {
            extra_stopwords: extra_stopwords
                .iter()
                .map(|word| word.trim().to_lowercase())
                .filter(|word| !word.is_empty())
                .collect(),
        }
    }

    fn lemma(surface: &str, language: &Language) -> String {
        let lowered = surface.to_lowercase().replace('’', "'");
        if language.lexicon_language() == Language::French {
            if let Some((prefix, rest)) = lowered.split_once('\'') {
                if ELIDED_PREFIXES.contains(&prefix) && !rest.is_empty() {
                    return rest.to_string();
                }
            }
        }
        lowered
    }
}

impl TokenAnnotator for LexiconAnnotator {
    fn supports(&self, language: &Language) -> bool {
        language.is_builtin()
    }

    fn annotate(
        &self,
        text: &str,
        language: &Language,
    ) -> Result<Vec<AnnotatedToken>, DiscourseError> {
        let stop = stopwords(language);
        Ok(WORD_RE
            .find_iter(text)
            .map(|found| {
                let surface = found.as_str().to_string();
                let lemma = Self::lemma(&surface, language);
                let is_stop =
                    stop.contains(lemma.as_str()) || self.extra_stopwords.contains(&lemma);
                AnnotatedToken {
                    is_alpha: lemma.chars().all(char::is_alphabetic),
                    is_stop,
                    is_entity: false,
                    surface,
                    lemma,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_stopwords_and_strips_elisions() {
        let annotator = LexiconAnnotator::default();
        let tokens = annotator
            .annotate("Nous voulons l'avenir, qu'importe 2024", &Language::French)
            .unwrap();
        let lemmas: Vec<&str> = tokens.iter().map(|t| t.lemma.as_str()).collect();
        assert_eq!(lemmas, vec!["nous", "voulons", "avenir", "importe", "2024"]);
        assert!(tokens[0].is_stop);
        assert!(!tokens[2].is_stop);
        assert!(!tokens[4].is_alpha);
    }

    #[test]
    fn english_keeps_contractions_non_alphabetic() {
        let annotator = LexiconAnnotator::default();
        let tokens = annotator
            .annotate("We don't surrender", &Language::English)
            .unwrap();
        assert!(tokens[0].is_stop);
        assert_eq!(tokens[1].lemma, "don't");
        assert!(!tokens[1].is_alpha);
        assert!(tokens[2].is_alpha && !tokens[2].is_stop);
    }

    #[test]
    fn extra_stopwords_are_honored() {
        let annotator = LexiconAnnotator::new(&["Peuple".into()]);
        let tokens = annotator.annotate("peuple", &Language::French).unwrap();
        assert!(tokens[0].is_stop);
        assert!(!annotator.supports(&Language::parse("it")));
    }
}
