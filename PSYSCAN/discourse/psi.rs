use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{algo::NO_SIGNAL, error::DiscourseError};

/// Named Psi definitions. The two are not numerically comparable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PsiMethod {
    /// Share plus two saturating resistance terms, 0-100.
    #[default]
    CompositeResistance,
    /// Recurrence of the most frequent block S1 over the block count, 0-1.
    MaxShareFraction,
}

impl PsiMethod {
    /// Stable identifier, as written in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CompositeResistance => "composite_resistance",
            Self::MaxShareFraction => "max_share_fraction",
        }
    }

    /// Strategy implementing this definition.
    #[must_use]
    pub fn strategy(self) -> Box<dyn PsiStrategy> {
        match self {
            Self::CompositeResistance => Box::new(CompositeResistancePsi),
            Self::MaxShareFraction => Box::new(MaxShareFractionPsi),
        }
    }
}

impl fmt::Display for PsiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PsiMethod {
    type Err = DiscourseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().replace('-', "_").as_str() {
            "composite_resistance" | "composite" => Ok(Self::CompositeResistance),
            "max_share_fraction" | "max_share" => Ok(Self::MaxShareFraction),
            other => Err(DiscourseError::InvalidConfig(format!(
                "unknown psi method `{other}`"
            ))),
        }
    }
}

/// Range a Psi value lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PsiScale {
    /// 0 to 100.
    Percent,
    /// 0 to 1.
    Unit,
}

/// Everything a strategy may draw on.
#[derive(Debug, Clone, Copy)]
pub struct PsiInput<'a> {
    /// Global S1.
    pub s1: &'a str,
    /// Global centrality share.
    pub share: f64,
    /// Occurrences of the global S1.
    pub count: usize,
    /// Qualifying tokens in the document.
    pub total: usize,
    /// Per-block S1 values, in block order.
    pub s1_history: &'a [String],
}

/// One Psi definition.
pub trait PsiStrategy: Send + Sync {
    /// Which definition this is.
    fn method(&self) -> PsiMethod;

    /// Range of [`PsiStrategy::compute`].
    fn scale(&self) -> PsiScale;

    /// Computes the index.
    fn compute(&self, input: &PsiInput<'_>) -> PsiReport;
}

/// Psi value plus how to read it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsiReport {
    /// Index value, on `scale`.
    pub value: f64,
    /// Definition used.
    pub method: PsiMethod,
    /// Range of `value`.
    pub scale: PsiScale,
    /// `(resistance1, resistance2)` for the composite definition.
    pub resistance: Option<(u32, u32)>,
    /// False when the document has no signal and `value` is degenerate.
    pub meaningful: bool,
}

impl PsiReport {
    /// Value brought to the 0-100 range.
    #[must_use]
    pub fn percent(&self) -> f64 {
        match self.scale {
            PsiScale::Percent => self.value,
            PsiScale::Unit => self.value * 100.0,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `round((share * 100 + r1 + r2) / 3, 1)` with `r1 = min(80 + 3c, 99)` and
/// `r2 = min(75 + 2c, 99)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeResistancePsi;

impl CompositeResistancePsi {
    /// The two saturating resistance terms for `count` occurrences.
    #[must_use]
    pub fn resistance(count: usize) -> (u32, u32) {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        let r1 = count.saturating_mul(3).saturating_add(80).min(99);
        let r2 = count.saturating_mul(2).saturating_add(75).min(99);
        (r1, r2)
    }
}

impl PsiStrategy for CompositeResistancePsi {
    fn method(&self) -> PsiMethod {
        PsiMethod::CompositeResistance
    }

    fn scale(&self) -> PsiScale {
        PsiScale::Percent
    }

    fn compute(&self, input: &PsiInput<'_>) -> PsiReport {
        let (r1, r2) = Self::resistance(input.count);
        let value = round1((input.share * 100.0 + f64::from(r1) + f64::from(r2)) / 3.0);
        PsiReport {
            value,
            method: self.method(),
            scale: self.scale(),
            resistance: Some((r1, r2)),
            meaningful: input.s1 != NO_SIGNAL,
        }
    }
}

/// Occurrences of the most frequent non-sentinel block S1 divided by the
/// number of blocks; 0 without blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxShareFractionPsi;

impl PsiStrategy for MaxShareFractionPsi {
    fn method(&self) -> PsiMethod {
        PsiMethod::MaxShareFraction
    }

    fn scale(&self) -> PsiScale {
        PsiScale::Unit
    }

    fn compute(&self, input: &PsiInput<'_>) -> PsiReport {
        let blocks = input.s1_history.len();
        let recurrence = crate::algo::TermFrequencies::from_lemmas(
            input
                .s1_history
                .iter()
                .filter(|s1| s1.as_str() != NO_SIGNAL)
                .map(String::as_str),
        )
        .most_common()
        .map_or(0, |(_, count)| count);
        #[allow(clippy::cast_precision_loss)]
        let value = if blocks == 0 {
            0.0
        } else {
            recurrence as f64 / blocks as f64
        };
        PsiReport {
            value,
            method: self.method(),
            scale: self.scale(),
            resistance: None,
            meaningful: input.s1 != NO_SIGNAL && recurrence > 0,
        }
    }
}
