use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::language::Language;

static JE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bje\b").expect("je pattern"));
static NOUS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bnous\b").expect("nous pattern"));
// Capital `I` only, so `i.e.` stays out.
static I_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bI\b").expect("i pattern"));
// Words after which `I` is a numeral ("World War I", "Part I").
static NUMERAL_HEAD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:war|part|chapter|act|phase|book|volume|vol|article|title|section)\s+$",
    )
    .expect("numeral head pattern")
});
static WE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bwe\b").expect("we pattern"));

/// First-person singular vs plural balance of a document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PronounCounts {
    /// `je` / `I` occurrences.
    pub singular: usize,
    /// `nous` / `we` occurrences.
    pub plural: usize,
    /// `plural / max(singular, 1)`.
    pub ratio: f64,
}

impl PronounCounts {
    /// Builds counts and their zero-guarded ratio.
    #[must_use]
    pub fn new(singular: usize, plural: usize) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let ratio = plural as f64 / singular.max(1) as f64;
        Self {
            singular,
            plural,
            ratio,
        }
    }
}

/// Counts whole-word first-person pronouns of the language (French
/// pronouns stand in for unsupported languages). Matching is
/// case-insensitive except for English `I`.
#[must_use]
pub fn count_pronouns(text: &str, language: &Language) -> PronounCounts {
    match language.lexicon_language() {
        Language::English => PronounCounts::new(
            I_RE.find_iter(text)
                .filter(|found| !after_numeral_head(&text[..found.start()]))
                .count(),
            WE_RE.find_iter(text).count(),
        ),
        _ => PronounCounts::new(
            JE_RE.find_iter(text).count(),
            NOUS_RE.find_iter(text).count(),
        ),
    }
}

fn after_numeral_head(before: &str) -> bool {
    let from = before.char_indices().rev().nth(15).map_or(0, |(at, _)| at);
    NUMERAL_HEAD_RE.is_match(&before[from..])
}
