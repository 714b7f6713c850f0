use crate::{
    language::Language,
    providers::{
        lexicon::{is_intensifier, is_negation, polarity_table, WORD_RE},
        SentimentScorer,
    },
};

const INTENSITY: f64 = 1.3;
const NEGATION_FACTOR: f64 = -0.5;
// Negation reaches at most this many tokens ahead.
const NEGATION_REACH: usize = 3;

/// Averages lexicon polarities over the words of a span. Negation flips
/// and halves the next scored word; intensifiers scale it up.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconSentimentScorer;

impl SentimentScorer for LexiconSentimentScorer {
    fn supports(&self, language: &Language) -> bool {
        language.is_builtin()
    }

    fn score(&self, span: &str, language: &Language) -> f64 {
        let table = polarity_table(language);
        let mut sum = 0.0;
        let mut scored = 0_u32;
        let mut negation_left = 0_usize;
        let mut intensity = 1.0;
        for found in WORD_RE.find_iter(span) {
            let word = found.as_str().to_lowercase().replace('’', "'");
            if is_negation(&word, language) {
                negation_left = NEGATION_REACH;
                continue;
            }
            if is_intensifier(&word) {
                intensity = INTENSITY;
                continue;
            }
            if let Some(value) = table.get(word.as_str()) {
                let mut value = value * intensity;
                if negation_left > 0 {
                    value *= NEGATION_FACTOR;
                    negation_left = 0;
                }
                sum += value;
                scored += 1;
                intensity = 1.0;
            } else {
                negation_left = negation_left.saturating_sub(1);
            }
        }
        if scored == 0 {
            0.0
        } else {
            (sum / f64::from(scored)).clamp(-1.0, 1.0)
        }
    }
}
