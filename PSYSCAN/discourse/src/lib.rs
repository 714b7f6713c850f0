#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Discourse seismograph: splits a speech into sentence blocks, tracks the
//! dominant signifier of each block, classifies the rhetorical regime and
//! flags ruptures, alongside the document-wide Psi index.

/// Engine errors and soft warnings.
#[path = "../error.rs"]
pub mod error;

/// Declared/resolved language handling.
#[path = "../language.rs"]
pub mod language;

/// Analysis configuration (TOML).
#[path = "../config.rs"]
pub mod config;

/// Telemetry builder/hook for the engine.
#[path = "../telemetry.rs"]
pub mod telemetry;

/// Lexical normalization helpers.
#[path = "../helper.rs"]
pub mod helper;

/// External linguistic collaborators and their built-in implementations.
#[path = "../providers/main.rs"]
pub mod providers;

/// Dominant-term extraction.
#[path = "../algo.rs"]
pub mod algo;

/// Sentiment scorer adapter.
#[path = "../polarity.rs"]
pub mod polarity;

/// First-person pronoun balance.
#[path = "../pronoun.rs"]
pub mod pronoun;

/// Global centrality (Psi) strategies.
#[path = "../psi.rs"]
pub mod psi;

/// Block partition, regime classifier and rupture detector.
#[path = "../seismograph/main.rs"]
pub mod seismograph;

/// Analysis entry point.
#[path = "../engine.rs"]
pub mod engine;

/// Interpretive lookup consuming the analysis output.
#[path = "../narrative.rs"]
pub mod narrative;

/// Concurrent multi-document analysis.
#[path = "../advanced.rs"]
pub mod advanced;

/// JSON-lines console ingestion.
#[path = "../console.rs"]
pub mod console;

pub use advanced::{AnalysisJob, BatchAnalyzer, BatchOutcome};
pub use algo::{DominantTerm, TermExtractor, TermFrequencies, NO_SIGNAL};
pub use config::AnalysisConfig;
pub use console::{ConsoleCommand, ConsoleCommandReceiver};
pub use engine::{BlockReading, DiscourseAnalysis, DiscourseAnalyzer, Document, GlobalReading};
pub use error::{AnalysisWarning, Collaborator, DiscourseError};
pub use language::Language;
pub use narrative::{NarrativeComposer, NarrativeReading, PowerIcon};
pub use polarity::{PolarityAdapter, PolarityLabel};
pub use pronoun::PronounCounts;
pub use providers::{
    AnnotatedToken, LanguageIdentifier, LinguisticResources, SentenceSegmenter, SentimentScorer,
    TokenAnnotator,
};
pub use psi::{PsiMethod, PsiReport, PsiScale, PsiStrategy};
pub use seismograph::{KeyMoment, Regime, RegimeClassifier, Seismograph, SeismographTrace};
pub use telemetry::{DiscourseTelemetry, DiscourseTelemetryBuilder};
