use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{language::Language, providers::SentimentScorer};

/// Coarse reading of a polarity score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PolarityLabel {
    /// Favorable framing.
    Positive,
    /// Unfavorable framing.
    Negative,
    /// Neither, or no evidence.
    Neutral,
}

impl PolarityLabel {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

/// Wraps the external scorer with the engine's thresholds and the
/// S1-localized reading.
#[derive(Clone)]
pub struct PolarityAdapter {
    scorer: Arc<dyn SentimentScorer>,
    language: Language,
    positive_threshold: f64,
    negative_threshold: f64,
}

impl fmt::Debug for PolarityAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolarityAdapter")
            .field("language", &self.language)
            .field("positive_threshold", &self.positive_threshold)
            .field("negative_threshold", &self.negative_threshold)
            .finish_non_exhaustive()
    }
}

impl PolarityAdapter {
    /// Creates the adapter. `language` is the language the scorer runs with.
    #[must_use]
    pub fn new(
        scorer: Arc<dyn SentimentScorer>,
        language: Language,
        positive_threshold: f64,
        negative_threshold: f64,
    ) -> Self {
        Self {
            scorer,
            language,
            positive_threshold,
            negative_threshold,
        }
    }

    /// Polarity of a block or sentence, clamped to `[-1, 1]`. Non-finite
    /// scores from the scorer read as neutral.
    #[must_use]
    pub fn score(&self, span: &str) -> f64 {
        let raw = self.scorer.score(span, &self.language);
        if raw.is_finite() {
            raw.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    /// Maps a score onto a label with the configured thresholds.
    #[must_use]
    pub fn label(&self, score: f64) -> PolarityLabel {
        if score > self.positive_threshold {
            PolarityLabel::Positive
        } else if score < self.negative_threshold {
            PolarityLabel::Negative
        } else {
            PolarityLabel::Neutral
        }
    }

    /// Mean polarity of the sentences mentioning `signifier`
    /// (case-insensitive), or `None` when none does.
    #[must_use]
    pub fn signifier_score(&self, sentences: &[String], signifier: &str) -> Option<f64> {
        let needle = signifier.to_lowercase();
        if needle.is_empty() {
            return None;
        }
        let scores: Vec<f64> = sentences
            .iter()
            .filter(|sentence| sentence.to_lowercase().contains(&needle))
            .map(|sentence| self.score(sentence))
            .collect();
        if scores.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        Some(mean)
    }

    /// Label of [`Self::signifier_score`]; neutral when S1 never occurs.
    #[must_use]
    pub fn signifier_label(&self, sentences: &[String], signifier: &str) -> PolarityLabel {
        self.signifier_score(sentences, signifier)
            .map_or(PolarityLabel::Neutral, |score| self.label(score))
    }
}
