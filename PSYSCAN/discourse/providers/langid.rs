use crate::{
    language::Language,
    providers::{
        lexicon::{stopwords, WORD_RE},
        LanguageIdentifier,
    },
};

/// Votes for the built-in language whose stopwords occur most often.
/// Ties and samples without any stopword are undecidable.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopwordLanguageIdentifier;

impl LanguageIdentifier for StopwordLanguageIdentifier {
    fn detect(&self, sample: &str) -> Option<String> {
        let french = stopwords(&Language::French);
        let english = stopwords(&Language::English);
        let (mut fr_hits, mut en_hits) = (0_usize, 0_usize);
        for found in WORD_RE.find_iter(sample) {
            let word = found.as_str().to_lowercase();
            if french.contains(word.as_str()) {
                fr_hits += 1;
            }
            if english.contains(word.as_str()) {
                en_hits += 1;
            }
        }
        match fr_hits.cmp(&en_hits) {
            std::cmp::Ordering::Greater => Some(Language::French.code().to_string()),
            std::cmp::Ordering::Less => Some(Language::English.code().to_string()),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_french_and_english() {
        let identifier = StopwordLanguageIdentifier;
        assert_eq!(
            identifier.detect("Nous sommes ici pour le peuple et pour la France.").as_deref(),
            Some("fr")
        );
        assert_eq!(
            identifier.detect("We are here for the people and for the nation.").as_deref(),
            Some("en")
        );
    }

    #[test]
    fn undecidable_samples_yield_none() {
        let identifier = StopwordLanguageIdentifier;
        assert_eq!(identifier.detect(""), None);
        assert_eq!(identifier.detect("Xylophone quantum"), None);
    }
}
