//! Block-by-block regime tracking.

/// Fixed-size sentence blocks.
pub mod blocks;
/// Trailing-window regime classification.
pub mod regime;
/// Regime transition detection.
pub mod rupture;

use serde::{Deserialize, Serialize};

pub use blocks::{partition, Block};
pub use regime::{Regime, RegimeClassifier};
pub use rupture::{KeyMoment, RuptureDetector};

/// Per-block features computed before classification. Independent across
/// blocks, so they may be produced in any order.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockObservation {
    /// 0-based block index.
    pub index: usize,
    /// Dominant signifier of the block.
    pub s1: String,
    /// Block polarity.
    pub polarity: f64,
    /// Block text, quoted by key moments.
    pub text: String,
}

/// Append-only record of one run: S1 history, regimes, polarities, key
/// moments. Observations must arrive in block order.
#[derive(Debug, Clone)]
pub struct Seismograph {
    classifier: RegimeClassifier,
    detector: RuptureDetector,
    s1_history: Vec<String>,
    regimes: Vec<Regime>,
    polarities: Vec<f64>,
    key_moments: Vec<KeyMoment>,
}

impl Seismograph {
    /// Creates an empty recorder.
    #[must_use]
    pub const fn new(classifier: RegimeClassifier, detector: RuptureDetector) -> Self {
        Self {
            classifier,
            detector,
            s1_history: Vec::new(),
            regimes: Vec::new(),
            polarities: Vec::new(),
            key_moments: Vec::new(),
        }
    }

    /// Records the next block and returns its regime. The observation is
    /// stored at the next position whatever its `index` says.
    pub fn record(&mut self, observation: &BlockObservation) -> Regime {
        let index = self.s1_history.len();
        self.s1_history.push(observation.s1.clone());
        self.polarities.push(observation.polarity);
        let regime = self
            .classifier
            .classify(&self.s1_history, observation.polarity);
        self.regimes.push(regime);
        if let Some(moment) = self.detector.detect(
            &self.regimes,
            index,
            &observation.s1,
            observation.polarity,
            &observation.text,
        ) {
            self.key_moments.push(moment);
        }
        regime
    }

    /// Blocks recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.s1_history.len()
    }

    /// Nothing recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.s1_history.is_empty()
    }

    /// S1 of every recorded block.
    #[must_use]
    pub fn s1_history(&self) -> &[String] {
        &self.s1_history
    }

    /// Regime of every recorded block.
    #[must_use]
    pub fn regimes(&self) -> &[Regime] {
        &self.regimes
    }

    /// Key moments so far.
    #[must_use]
    pub fn key_moments(&self) -> &[KeyMoment] {
        &self.key_moments
    }

    /// Consumes the recorder.
    #[must_use]
    pub fn finish(self) -> SeismographTrace {
        SeismographTrace {
            s1_history: self.s1_history,
            regimes: self.regimes,
            polarities: self.polarities,
            key_moments: self.key_moments,
        }
    }
}

impl Default for Seismograph {
    fn default() -> Self {
        Self::new(RegimeClassifier::default(), RuptureDetector::default())
    }
}

/// Final seismograph output, one entry per block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeismographTrace {
    /// S1 per block.
    pub s1_history: Vec<String>,
    /// Regime per block.
    pub regimes: Vec<Regime>,
    /// Polarity per block.
    pub polarities: Vec<f64>,
    /// Regime transitions.
    pub key_moments: Vec<KeyMoment>,
}

impl SeismographTrace {
    /// Plot values per block, `None` where the regime is unknown.
    #[must_use]
    pub fn signals(&self) -> Vec<Option<i8>> {
        self.regimes.iter().map(|regime| regime.signal()).collect()
    }
}
