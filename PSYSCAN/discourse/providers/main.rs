//! Contracts of the external linguistic collaborators, and the built-in
//! lexicon-based implementations the engine uses by default.

/// Built-in stopword and polarity tables.
pub mod lexicon;
/// Rule-based sentence segmentation.
pub mod segmenter;
/// Lexicon token annotator.
pub mod annotator;
/// Lexicon polarity scorer.
pub mod sentiment;
/// Stopword-vote language identifier.
pub mod langid;

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{error::DiscourseError, language::Language};

pub use annotator::LexiconAnnotator;
pub use langid::StopwordLanguageIdentifier;
pub use segmenter::{RuleSentenceSegmenter, SegmentationRules};
pub use sentiment::LexiconSentimentScorer;

/// Token with the linguistic flags the term extractor filters on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedToken {
    /// Form as it appears in the text.
    pub surface: String,
    /// Lemma (case-folded by the extractor).
    pub lemma: String,
    /// Only letters.
    pub is_alpha: bool,
    /// Function word for the language.
    pub is_stop: bool,
    /// Part of a named entity.
    #[serde(default)]
    pub is_entity: bool,
}

/// Splits a text into ordered sentences.
pub trait SentenceSegmenter: Send + Sync {
    /// Whether rules exist for `language`.
    fn supports(&self, language: &Language) -> bool;

    /// Segments `text` with the rules of `language`.
    fn segment(&self, text: &str, language: &Language) -> Result<Vec<String>, DiscourseError>;
}

/// Produces lemma/stopword/alphabetic annotations.
pub trait TokenAnnotator: Send + Sync {
    /// Whether a model exists for `language`.
    fn supports(&self, language: &Language) -> bool;

    /// Annotates every token of `text`.
    fn annotate(&self, text: &str, language: &Language)
        -> Result<Vec<AnnotatedToken>, DiscourseError>;
}

/// Scores the polarity of a text span in `[-1, 1]`.
pub trait SentimentScorer: Send + Sync {
    /// Whether a lexicon/model exists for `language`.
    fn supports(&self, language: &Language) -> bool;

    /// Polarity of `span`; `0.0` is neutral.
    fn score(&self, span: &str, language: &Language) -> f64;
}

/// Guesses the language of a text sample.
pub trait LanguageIdentifier: Send + Sync {
    /// Detected code, or `None` when undecidable.
    fn detect(&self, sample: &str) -> Option<String>;
}

/// Read-only bundle of collaborators handed to the analyzer. Build it once
/// and share it; the engine never creates or mutates these.
#[derive(Clone)]
pub struct LinguisticResources {
    /// Sentence segmenter.
    pub segmenter: Arc<dyn SentenceSegmenter>,
    /// Token annotator.
    pub annotator: Arc<dyn TokenAnnotator>,
    /// Polarity scorer.
    pub sentiment: Arc<dyn SentimentScorer>,
    /// Optional language identifier; mismatch checks are skipped without it.
    pub identifier: Option<Arc<dyn LanguageIdentifier>>,
}

impl LinguisticResources {
    /// Built-in collaborators, with extra stopwords for the annotator.
    #[must_use]
    pub fn builtin(extra_stopwords: &[String]) -> Self {
        Self {
            segmenter: Arc::new(RuleSentenceSegmenter::default()),
            annotator: Arc::new(LexiconAnnotator::new(extra_stopwords)),
            sentiment: Arc::new(LexiconSentimentScorer),
            identifier: Some(Arc::new(StopwordLanguageIdentifier)),
        }
    }

    /// Replaces the segmenter.
    #[must_use]
    pub fn with_segmenter(mut self, segmenter: Arc<dyn SentenceSegmenter>) -> Self {
        self.segmenter = segmenter;
        self
    }

    /// Replaces the annotator.
    #[must_use]
    pub fn with_annotator(mut self, annotator: Arc<dyn TokenAnnotator>) -> Self {
        self.annotator = annotator;
        self
    }

    /// Replaces the polarity scorer.
    #[must_use]
    pub fn with_sentiment(mut self, sentiment: Arc<dyn SentimentScorer>) -> Self {
        self.sentiment = sentiment;
        self
    }

    /// Replaces or removes the language identifier.
    #[must_use]
    pub fn with_identifier(mut self, identifier: Option<Arc<dyn LanguageIdentifier>>) -> Self {
        self.identifier = identifier;
        self
    }
}

impl Default for LinguisticResources {
    fn default() -> Self {
        Self::builtin(&[])
    }
}

impl fmt::Debug for LinguisticResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinguisticResources")
            .field("identifier", &self.identifier.is_some())
            .finish_non_exhaustive()
    }
}
