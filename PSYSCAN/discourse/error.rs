use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::language::Language;

/// Hard failures of the engine. Degenerate input is never one of them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DiscourseError {
    /// Neither the requested nor the default language can be segmented.
    #[error("no sentence segmentation rules available for language {language}")]
    SegmentationUnavailable {
        /// Requested language code.
        language: String,
    },
    /// Configuration rejected by validation.
    #[error("invalid analysis config: {0}")]
    InvalidConfig(String),
    /// A collaborator failed in a way the engine cannot recover from.
    #[error("collaborator failure: {0}")]
    Collaborator(String),
}

/// External collaborator that can fall back to the default language.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Collaborator {
    /// Sentence segmenter.
    Segmenter,
    /// Token annotator (lemma/stopword flags).
    Annotator,
    /// Polarity scorer.
    SentimentScorer,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Segmenter => "segmenter",
            Self::Annotator => "annotator",
            Self::SentimentScorer => "sentiment scorer",
        })
    }
}

/// Advisory conditions surfaced next to a successful result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// The identifier disagrees with the declared language. Results still
    /// use the declared language.
    LanguageMismatch {
        /// Declared code.
        declared: String,
        /// Detected code.
        detected: String,
    },
    /// A collaborator ran with the default language's resources.
    CollaboratorFallback {
        /// Which collaborator fell back.
        collaborator: Collaborator,
        /// Requested language.
        requested: Language,
        /// Language actually used.
        used: Language,
    },
    /// The document holds no qualifying token; S1 is the `?` sentinel.
    NoSignal,
}

impl AnalysisWarning {
    /// Stable key for logs.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::LanguageMismatch { .. } => "language_mismatch",
            Self::CollaboratorFallback { .. } => "collaborator_fallback",
            Self::NoSignal => "no_signal",
        }
    }
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LanguageMismatch { declared, detected } => {
                write!(f, "detected language {detected} differs from declared {declared}")
            }
            Self::CollaboratorFallback {
                collaborator,
                requested,
                used,
            } => write!(
                f,
                "{collaborator} has no resources for {requested}, fell back to {used}"
            ),
            Self::NoSignal => f.write_str("no qualifying token in document"),
        }
    }
}
