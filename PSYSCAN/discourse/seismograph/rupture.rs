use serde::{Deserialize, Serialize};

use super::regime::Regime;
use crate::helper::excerpt;

/// Flagged regime transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMoment {
    /// 0-based block index.
    pub block_index: usize,
    /// 1-based block number, as shown to readers.
    pub ordinal: usize,
    /// S1 of the block.
    pub s1: String,
    /// Regime entered.
    pub regime: Regime,
    /// Regime left.
    pub previous_regime: Regime,
    /// Block polarity, two decimals.
    pub polarity: f64,
    /// Opening of the block text.
    pub quote: String,
}

/// Emits a key moment whenever the regime changes after the second block.
#[derive(Debug, Clone, Copy)]
pub struct RuptureDetector {
    excerpt_chars: usize,
}

impl RuptureDetector {
    /// Creates a detector quoting up to `excerpt_chars` characters.
    #[must_use]
    pub const fn new(excerpt_chars: usize) -> Self {
        Self { excerpt_chars }
    }

    /// Checks block `index` against the regimes recorded so far, the
    /// current one included.
    #[must_use]
    pub fn detect(
        &self,
        regimes: &[Regime],
        index: usize,
        s1: &str,
        polarity: f64,
        text: &str,
    ) -> Option<KeyMoment> {
        if index <= 1 {
            return None;
        }
        let (regime, previous_regime) = (*regimes.get(index)?, *regimes.get(index - 1)?);
        if regime == previous_regime {
            return None;
        }
        Some(KeyMoment {
            block_index: index,
            ordinal: index + 1,
            s1: s1.to_string(),
            regime,
            previous_regime,
            polarity: (polarity * 100.0).round() / 100.0,
            quote: excerpt(text, self.excerpt_chars),
        })
    }
}

impl Default for RuptureDetector {
    fn default() -> Self {
        Self::new(150)
    }
}
