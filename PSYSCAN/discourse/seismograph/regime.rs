use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

/// Rhetorical posture of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Not enough history (first block only).
    Unknown,
    /// Same anchor under favorable framing.
    Centripetal,
    /// Anchor churn or unfavorable framing.
    Centrifugal,
    /// Anything in between.
    Oscillating,
}

impl Regime {
    /// Lowercase label; `?` for unknown.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "?",
            Self::Centripetal => "centripetal",
            Self::Centrifugal => "centrifugal",
            Self::Oscillating => "oscillating",
        }
    }

    /// Plot value: 1 centripetal, 0 oscillating, -1 centrifugal.
    #[must_use]
    pub const fn signal(self) -> Option<i8> {
        match self {
            Self::Unknown => None,
            Self::Centripetal => Some(1),
            Self::Oscillating => Some(0),
            Self::Centrifugal => Some(-1),
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pure function of the trailing S1 window and the current polarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegimeClassifier {
    window: usize,
    positive_threshold: f64,
    negative_threshold: f64,
}

impl RegimeClassifier {
    /// Creates a classifier inspecting the last `window` S1 values.
    #[must_use]
    pub fn new(window: usize, positive_threshold: f64, negative_threshold: f64) -> Self {
        Self {
            window: window.max(1),
            positive_threshold,
            negative_threshold,
        }
    }

    /// Classifies the latest block. `history` already holds its S1.
    ///
    /// Short histories are read as-is: with two entries the window holds
    /// two values.
    #[must_use]
    pub fn classify(&self, history: &[String], polarity: f64) -> Regime {
        if history.len() < 2 {
            return Regime::Unknown;
        }
        let start = history.len().saturating_sub(self.window);
        let distinct = history[start..]
            .iter()
            .map(String::as_str)
            .collect::<HashSet<_>>()
            .len();
        if distinct == 1 && polarity > self.positive_threshold {
            Regime::Centripetal
        } else if distinct >= self.window.max(2) || polarity < self.negative_threshold {
            Regime::Centrifugal
        } else {
            Regime::Oscillating
        }
    }
}

impl Default for RegimeClassifier {
    fn default() -> Self {
        Self::new(3, 0.1, -0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn first_block_is_unknown() {
        let classifier = RegimeClassifier::default();
        assert_eq!(classifier.classify(&history(&["a"]), 0.9), Regime::Unknown);
        assert_eq!(classifier.classify(&[], -0.9), Regime::Unknown);
    }

    #[test]
    fn transition_table() {
        let classifier = RegimeClassifier::default();
        assert_eq!(classifier.classify(&history(&["a", "a"]), 0.2), Regime::Centripetal);
        assert_eq!(classifier.classify(&history(&["a", "a"]), 0.1), Regime::Oscillating);
        assert_eq!(classifier.classify(&history(&["a", "b"]), 0.5), Regime::Oscillating);
        assert_eq!(classifier.classify(&history(&["a", "a", "b"]), -0.2), Regime::Centrifugal);
        assert_eq!(classifier.classify(&history(&["a", "b", "c"]), 0.5), Regime::Centrifugal);
        // Only the trailing three count.
        assert_eq!(
            classifier.classify(&history(&["b", "c", "a", "a", "a"]), 0.3),
            Regime::Centripetal
        );
    }

    #[test]
    fn signals() {
        assert_eq!(Regime::Centripetal.signal(), Some(1));
        assert_eq!(Regime::Oscillating.signal(), Some(0));
        assert_eq!(Regime::Centrifugal.signal(), Some(-1));
        assert_eq!(Regime::Unknown.signal(), None);
        assert_eq!(Regime::Unknown.to_string(), "?");
    }
}
