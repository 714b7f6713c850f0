use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::providers::AnnotatedToken;

/// S1 of a unit without any qualifying token.
pub const NO_SIGNAL: &str = "?";

/// Lemma counts in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermFrequencies(IndexMap<String, usize>);

impl TermFrequencies {
    /// Counts lemmas, keeping the order in which each was first seen.
    pub fn from_lemmas<I, S>(lemmas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counts = IndexMap::new();
        for lemma in lemmas {
            *counts.entry(lemma.into()).or_insert(0) += 1;
        }
        Self(counts)
    }

    /// Occurrences of `lemma`.
    #[must_use]
    pub fn count(&self, lemma: &str) -> usize {
        self.0.get(lemma).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Distinct lemmas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// No lemma counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Most frequent lemma; the first seen wins ties.
    #[must_use]
    pub fn most_common(&self) -> Option<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;
        for (lemma, &count) in &self.0 {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((lemma.as_str(), count));
            }
        }
        best
    }

    /// The `n` most frequent lemmas, ties in first-seen order.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        let mut ranked: Vec<(String, usize)> = self
            .0
            .iter()
            .map(|(lemma, count)| (lemma.clone(), *count))
            .collect();
        // Stable sort keeps insertion order among equal counts.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

/// Dominant signifier of a unit of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominantTerm {
    /// Most frequent qualifying lemma, or [`NO_SIGNAL`].
    pub s1: String,
    /// `count / total`, 0 for the sentinel.
    pub share: f64,
    /// Occurrences of `s1`.
    pub count: usize,
    /// Qualifying tokens in the unit.
    pub total: usize,
    /// Full frequency table.
    pub frequencies: TermFrequencies,
}

impl DominantTerm {
    /// Result for a unit with no qualifying token.
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            s1: NO_SIGNAL.to_string(),
            share: 0.0,
            count: 0,
            total: 0,
            frequencies: TermFrequencies::default(),
        }
    }

    /// Elects the most frequent entry of `frequencies`.
    #[must_use]
    pub fn from_frequencies(frequencies: TermFrequencies) -> Self {
        let total = frequencies.total();
        let Some((s1, count)) = frequencies
            .most_common()
            .map(|(lemma, count)| (lemma.to_string(), count))
        else {
            return Self::sentinel();
        };
        #[allow(clippy::cast_precision_loss)]
        let share = count as f64 / total as f64;
        Self {
            s1,
            share,
            count,
            total,
            frequencies,
        }
    }

    /// Whether this is the "no signal" result.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.s1 == NO_SIGNAL
    }
}

/// Filters annotated tokens and elects the dominant lemma.
#[derive(Debug, Clone, Copy)]
pub struct TermExtractor {
    min_chars: usize,
}

impl TermExtractor {
    /// Keeps lemmas of at least `min_chars` characters.
    #[must_use]
    pub const fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    /// Case-folded lemmas of qualifying tokens, in text order: alphabetic,
    /// not a stopword, not an entity, long enough.
    #[must_use]
    pub fn qualifying_lemmas(&self, tokens: &[AnnotatedToken]) -> Vec<String> {
        tokens
            .iter()
            .filter(|token| token.is_alpha && !token.is_stop && !token.is_entity)
            .map(|token| token.lemma.to_lowercase())
            .filter(|lemma| lemma.chars().count() >= self.min_chars)
            .collect()
    }

    /// Elects the dominant lemma of `tokens`.
    #[must_use]
    pub fn extract(&self, tokens: &[AnnotatedToken]) -> DominantTerm {
        let lemmas = self.qualifying_lemmas(tokens);
        DominantTerm::from_frequencies(TermFrequencies::from_lemmas(lemmas))
    }
}

impl Default for TermExtractor {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Lemmas most often found within `window` tokens of `anchor`, best first,
/// at most `limit` of them.
#[must_use]
pub fn cooccurrences(lemmas: &[String], anchor: &str, window: usize, limit: usize) -> Vec<String> {
    let mut neighbours: Vec<&str> = Vec::new();
    for (idx, lemma) in lemmas.iter().enumerate() {
        if lemma != anchor {
            continue;
        }
        let start = idx.saturating_sub(window);
        let end = (idx + window + 1).min(lemmas.len());
        neighbours.extend(
            lemmas[start..end]
                .iter()
                .filter(|word| word.as_str() != anchor)
                .map(String::as_str),
        );
    }
    TermFrequencies::from_lemmas(neighbours)
        .top(limit)
        .into_iter()
        .map(|(lemma, _)| lemma)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(lemma: &str) -> AnnotatedToken {
        AnnotatedToken {
            surface: lemma.to_string(),
            lemma: lemma.to_string(),
            is_alpha: lemma.chars().all(char::is_alphabetic),
            is_stop: matches!(lemma, "les" | "nous" | "the"),
            is_entity: false,
        }
    }

    fn tokens(text: &str) -> Vec<AnnotatedToken> {
        text.split_whitespace().map(token).collect()
    }

    #[test]
    fn elects_most_frequent_qualifying_lemma() {
        let extractor = TermExtractor::default();
        let result = extractor.extract(&tokens("nous Peuple travail peuple les peuple a 2024"));
        assert_eq!(result.s1, "peuple");
        assert_eq!(result.count, 3);
        assert_eq!(result.total, 4);
        assert!((result.share - 0.75).abs() < 1e-12);
    }

    #[test]
    fn ties_go_to_first_seen() {
        let extractor = TermExtractor::default();
        let result = extractor.extract(&tokens("travail france france travail"));
        assert_eq!(result.s1, "travail");
        let again = extractor.extract(&tokens("travail france france travail"));
        assert_eq!(result, again);
    }

    #[test]
    fn no_qualifying_token_yields_sentinel() {
        let extractor = TermExtractor::default();
        let result = extractor.extract(&tokens("nous les de 42"));
        assert!(result.is_sentinel());
        assert_eq!(result.share, 0.0);
        assert!(result.frequencies.is_empty());
        assert!(extractor.extract(&[]).is_sentinel());
    }

    #[test]
    fn entities_are_excluded() {
        let mut input = tokens("macron macron réforme");
        input[0].is_entity = true;
        input[1].is_entity = true;
        assert_eq!(TermExtractor::default().extract(&input).s1, "réforme");
    }

    #[test]
    fn top_terms_and_cooccurrence_loop() {
        let lemmas: Vec<String> = "travail avenir peuple travail effort peuple avenir travail"
            .split_whitespace()
            .map(String::from)
            .collect();
        let frequencies = TermFrequencies::from_lemmas(lemmas.clone());
        assert_eq!(frequencies.len(), 4);
        assert_eq!(frequencies.total(), 8);
        assert_eq!(frequencies.count("peuple"), 2);
        assert_eq!(frequencies.count("absent"), 0);
        assert_eq!(
            frequencies.top(2),
            vec![("travail".to_string(), 3), ("avenir".to_string(), 2)]
        );
        assert_eq!(
            cooccurrences(&lemmas, "travail", 1, 2),
            vec!["avenir".to_string(), "peuple".to_string()]
        );
        assert!(cooccurrences(&lemmas, "absent", 5, 2).is_empty());
    }
}
