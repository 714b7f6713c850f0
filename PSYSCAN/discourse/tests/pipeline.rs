use std::sync::Arc;

use psyscan_discourse::{
    AnalysisConfig, AnalysisWarning, AnnotatedToken, Collaborator, DiscourseAnalyzer,
    DiscourseError, DiscourseTelemetry, Document, Language, LanguageIdentifier,
    LinguisticResources, NarrativeComposer, PowerIcon, Regime, SentenceSegmenter,
    SentimentScorer, TokenAnnotator,
};
use serde_json::Value;
use shared_event_bus::MemoryEventBus;
use tempfile::tempdir;

/// Splits on `.`, knows only French.
struct StubSegmenter;

impl SentenceSegmenter for StubSegmenter {
    fn supports(&self, language: &Language) -> bool {
        *language == Language::French
    }

    fn segment(&self, text: &str, _language: &Language) -> Result<Vec<String>, DiscourseError> {
        Ok(text
            .split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("{s}."))
            .collect())
    }
}

/// Whitespace tokens; `x` is a stopword.
struct StubAnnotator;

impl TokenAnnotator for StubAnnotator {
    fn supports(&self, _language: &Language) -> bool {
        true
    }

    fn annotate(
        &self,
        text: &str,
        _language: &Language,
    ) -> Result<Vec<AnnotatedToken>, DiscourseError> {
        Ok(text
            .split(|c: char| c.is_whitespace() || c == '.')
            .filter(|w| !w.is_empty())
            .map(|w| AnnotatedToken {
                surface: w.to_string(),
                lemma: w.to_string(),
                is_alpha: w.chars().all(char::is_alphabetic),
                is_stop: w == "x",
                is_entity: false,
            })
            .collect())
    }
}

/// Keyword polarity: happy 0.3, glad 0.2, sad -0.2.
struct StubScorer;

impl SentimentScorer for StubScorer {
    fn supports(&self, _language: &Language) -> bool {
        true
    }

    fn score(&self, span: &str, _language: &Language) -> f64 {
        if span.contains("happy") {
            0.3
        } else if span.contains("glad") {
            0.2
        } else if span.contains("sad") {
            -0.2
        } else {
            0.0
        }
    }
}

struct FixedIdentifier(&'static str);

impl LanguageIdentifier for FixedIdentifier {
    fn detect(&self, _sample: &str) -> Option<String> {
        Some(self.0.to_string())
    }
}

fn stub_resources() -> LinguisticResources {
    LinguisticResources::default()
        .with_segmenter(Arc::new(StubSegmenter))
        .with_annotator(Arc::new(StubAnnotator))
        .with_sentiment(Arc::new(StubScorer))
        .with_identifier(None)
}

fn config(block_size: usize) -> AnalysisConfig {
    AnalysisConfig {
        block_size,
        ..AnalysisConfig::default()
    }
}

// 12 sentences: blocks of 5 anchored on alpha, alpha, beta.
fn twelve_sentences() -> String {
    let mut sentences = Vec::new();
    for _ in 0..5 {
        sentences.push("alpha alpha happy x");
    }
    for _ in 0..5 {
        sentences.push("alpha alpha glad x");
    }
    sentences.push("beta beta sad");
    sentences.push("beta alpha sad");
    sentences.join(". ") + "."
}

#[test]
fn twelve_sentences_in_blocks_of_five() {
    let analyzer = DiscourseAnalyzer::new(config(5), stub_resources()).unwrap();
    let analysis = analyzer
        .analyze(&Document::new(twelve_sentences(), Language::French))
        .unwrap();

    assert_eq!(analysis.sentence_count, 12);
    let sizes: Vec<usize> = analysis.blocks.iter().map(|b| b.sentences.len()).collect();
    assert_eq!(sizes, vec![5, 5, 2]);
    assert_eq!(analysis.trace.s1_history, vec!["alpha", "alpha", "beta"]);
    assert_eq!(analysis.trace.polarities, vec![0.3, 0.2, -0.2]);
    assert_eq!(
        analysis.trace.regimes,
        vec![Regime::Unknown, Regime::Centripetal, Regime::Centrifugal]
    );
    assert_eq!(analysis.trace.key_moments.len(), 1);
    let moment = &analysis.trace.key_moments[0];
    assert_eq!(moment.block_index, 2);
    assert_eq!(moment.ordinal, 3);
    assert_eq!(moment.s1, "beta");
    assert!(moment.quote.starts_with("beta beta sad."));

    assert_eq!(analysis.global.s1, "alpha");
    assert_eq!(analysis.global.count, 21);
    assert_eq!(analysis.global.total_terms, 36);
    assert!(analysis.psi.meaningful);
    assert!(analysis.warnings.is_empty());
}

#[test]
fn steady_anchor_yields_no_key_moment() {
    let text = vec!["alpha happy"; 9].join(". ");
    let analysis = DiscourseAnalyzer::new(config(3), stub_resources())
        .unwrap()
        .analyze(&Document::new(text, Language::French))
        .unwrap();
    assert_eq!(
        analysis.trace.regimes,
        vec![Regime::Unknown, Regime::Centripetal, Regime::Centripetal]
    );
    assert!(analysis.trace.key_moments.is_empty());
}

#[test]
fn stopword_only_document_has_no_signal() {
    let analysis = DiscourseAnalyzer::new(config(2), stub_resources())
        .unwrap()
        .analyze(&Document::new("x x. x. 42 x.", Language::French))
        .unwrap();
    assert_eq!(analysis.global.s1, "?");
    assert!(analysis.trace.s1_history.iter().all(|s1| s1 == "?"));
    assert!(!analysis.psi.meaningful);
    assert!(analysis.global.loop_terms.is_empty());
    assert_eq!(analysis.warnings, vec![AnalysisWarning::NoSignal]);
}

#[test]
fn mismatch_is_advisory_only() {
    let text = twelve_sentences();
    let plain = DiscourseAnalyzer::new(config(5), stub_resources())
        .unwrap()
        .analyze(&Document::new(text.clone(), Language::French))
        .unwrap();
    let resources = stub_resources().with_identifier(Some(Arc::new(FixedIdentifier("en"))));
    let flagged = DiscourseAnalyzer::new(config(5), resources)
        .unwrap()
        .analyze(&Document::new(text, Language::French))
        .unwrap();
    assert_eq!(
        flagged.warnings,
        vec![AnalysisWarning::LanguageMismatch {
            declared: "fr".into(),
            detected: "en".into(),
        }]
    );
    assert_eq!(flagged.trace, plain.trace);
    assert_eq!(flagged.global, plain.global);
}

#[test]
fn segmenter_fallback_is_surfaced() {
    let analysis = DiscourseAnalyzer::new(config(5), stub_resources())
        .unwrap()
        .analyze(&Document::new(twelve_sentences(), Language::English))
        .unwrap();
    assert_eq!(
        analysis.warnings,
        vec![AnalysisWarning::CollaboratorFallback {
            collaborator: Collaborator::Segmenter,
            requested: Language::English,
            used: Language::French,
        }]
    );
    assert_eq!(analysis.blocks.len(), 3);
}

#[test]
fn missing_segmentation_is_a_hard_error() {
    struct NoRules;
    impl SentenceSegmenter for NoRules {
        fn supports(&self, _language: &Language) -> bool {
            false
        }
        fn segment(&self, _text: &str, language: &Language) -> Result<Vec<String>, DiscourseError> {
            Err(DiscourseError::SegmentationUnavailable {
                language: language.code().to_string(),
            })
        }
    }
    let resources = stub_resources().with_segmenter(Arc::new(NoRules));
    let err = DiscourseAnalyzer::new(config(5), resources)
        .unwrap()
        .analyze(&Document::new("alpha.", Language::English))
        .unwrap_err();
    assert_eq!(
        err,
        DiscourseError::SegmentationUnavailable {
            language: "en".into()
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn telemetry_records_warnings_and_ruptures() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("discourse.log");
    let bus = Arc::new(MemoryEventBus::new(32));
    let tel = DiscourseTelemetry::builder("discourse")
        .log_path(&log_path)
        .event_publisher(bus.clone())
        .build()
        .unwrap();
    let resources = stub_resources().with_identifier(Some(Arc::new(FixedIdentifier("en"))));
    let analyzer = DiscourseAnalyzer::new(config(5), resources)
        .unwrap()
        .with_telemetry(tel.clone());
    let analysis = analyzer
        .analyze(&Document::new(twelve_sentences(), Language::French))
        .unwrap();

    let messages: Vec<String> = std::fs::read_to_string(&log_path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).unwrap())
        .map(|record| record["message"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(
        messages,
        vec![
            "discourse.analysis.start",
            "discourse.analysis.warning",
            "discourse.analysis.completed"
        ]
    );

    tel.flush().await;
    let ruptures = bus.events_of_type("discourse.rupture.detected");
    assert_eq!(ruptures.len(), 1);
    assert_eq!(ruptures[0].payload["block"], 3);
    assert_eq!(ruptures[0].payload["to"], "centrifugal");
    let completed = bus.events_of_type("discourse.analysis.completed");
    assert_eq!(completed.len(), 1);
    assert_eq!(
        completed[0].payload["analysis_id"],
        serde_json::json!(analysis.id)
    );
}

#[test]
fn narrative_reads_from_analysis_only() {
    let text = format!("{} Je travaille. Nous. Nous. Nous.", twelve_sentences());
    let analysis = DiscourseAnalyzer::new(config(5), stub_resources())
        .unwrap()
        .analyze(&Document::new(text, Language::French))
        .unwrap();
    let reading = NarrativeComposer::default().compose(&analysis);
    assert_eq!(reading.s1, "alpha");
    assert_eq!(reading.ritual_count, analysis.global.count);
    assert_eq!(
        reading.anchor,
        "L'obsession de « alpha » comme acte de pouvoir"
    );
    assert_eq!(
        reading.icon,
        PowerIcon::from_percent(analysis.psi.percent())
    );
}
