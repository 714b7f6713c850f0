use std::{fs, num::NonZeroUsize, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{error::DiscourseError, language::Language, psi::PsiMethod};

/// Tunables of one analysis run, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    /// Declared document language.
    #[serde(default)]
    pub language: Language,
    /// Sentences per block.
    #[serde(default = "default_block_size")]
    pub block_size: usize,
    /// Psi definition.
    #[serde(default)]
    pub psi_method: PsiMethod,
    /// Maximum characters kept in a key-moment quote.
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,
    /// Minimum lemma length, in characters, for a token to count.
    #[serde(default = "default_min_term_chars")]
    pub min_term_chars: usize,
    /// Polarity above which a block reads as favorable.
    #[serde(default = "default_positive_threshold")]
    pub positive_threshold: f64,
    /// Polarity below which a block reads as unfavorable.
    #[serde(default = "default_negative_threshold")]
    pub negative_threshold: f64,
    /// Trailing S1 values inspected by the regime classifier.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Characters handed to the language identifier.
    #[serde(default = "default_detection_sample_chars")]
    pub detection_sample_chars: usize,
    /// Disfluencies stripped in addition to the built-in list.
    #[serde(default)]
    pub extra_oral_artifacts: Vec<String>,
    /// Stopwords added to the built-in lists.
    #[serde(default)]
    pub extra_stopwords: Vec<String>,
}

impl AnalysisConfig {
    /// Loads and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading analysis config {}", path.display()))?;
        let config =
            Self::from_toml_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants the engine relies on.
    pub fn validate(&self) -> Result<(), DiscourseError> {
        if self.language.code().is_empty() {
            return Err(DiscourseError::InvalidConfig(
                "language must not be empty".into(),
            ));
        }
        if self.block_size == 0 {
            return Err(DiscourseError::InvalidConfig(
                "block_size must be at least 1".into(),
            ));
        }
        if self.history_window == 0 {
            return Err(DiscourseError::InvalidConfig(
                "history_window must be at least 1".into(),
            ));
        }
        if self.excerpt_chars == 0 {
            return Err(DiscourseError::InvalidConfig(
                "excerpt_chars must be at least 1".into(),
            ));
        }
        if !self.positive_threshold.is_finite() || !self.negative_threshold.is_finite() {
            return Err(DiscourseError::InvalidConfig(
                "polarity thresholds must be finite".into(),
            ));
        }
        if self.negative_threshold > self.positive_threshold {
            return Err(DiscourseError::InvalidConfig(format!(
                "negative_threshold {} exceeds positive_threshold {}",
                self.negative_threshold, self.positive_threshold
            )));
        }
        Ok(())
    }

    /// Block size as a non-zero count.
    pub fn block_size(&self) -> Result<NonZeroUsize, DiscourseError> {
        NonZeroUsize::new(self.block_size)
            .ok_or_else(|| DiscourseError::InvalidConfig("block_size must be at least 1".into()))
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            block_size: default_block_size(),
            psi_method: PsiMethod::default(),
            excerpt_chars: default_excerpt_chars(),
            min_term_chars: default_min_term_chars(),
            positive_threshold: default_positive_threshold(),
            negative_threshold: default_negative_threshold(),
            history_window: default_history_window(),
            detection_sample_chars: default_detection_sample_chars(),
            extra_oral_artifacts: Vec::new(),
            extra_stopwords: Vec::new(),
        }
    }
}

const fn default_block_size() -> usize {
    6
}

const fn default_excerpt_chars() -> usize {
    150
}

const fn default_min_term_chars() -> usize {
    3
}

const fn default_positive_threshold() -> f64 {
    0.1
}

const fn default_negative_threshold() -> f64 {
    -0.1
}

const fn default_history_window() -> usize {
    3
}

const fn default_detection_sample_chars() -> usize {
    500
}
