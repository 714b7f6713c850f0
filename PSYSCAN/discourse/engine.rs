use std::{fmt, num::NonZeroUsize, ops::Range};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_logging::LogLevel;
use uuid::Uuid;

use crate::{
    algo::{cooccurrences, DominantTerm, TermExtractor, TermFrequencies},
    config::AnalysisConfig,
    error::{AnalysisWarning, Collaborator, DiscourseError},
    helper::LexicalNormalizer,
    language::Language,
    polarity::{PolarityAdapter, PolarityLabel},
    pronoun::{count_pronouns, PronounCounts},
    providers::LinguisticResources,
    psi::{PsiInput, PsiReport, PsiStrategy},
    seismograph::{
        partition, Block, BlockObservation, Regime, RegimeClassifier, RuptureDetector,
        Seismograph, SeismographTrace,
    },
    telemetry::DiscourseTelemetry,
};

const TOP_TERMS: usize = 3;
const LOOP_WINDOW: usize = 5;
const LOOP_TERMS: usize = 2;

/// Text to analyze plus its declared language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    text: String,
    language: Language,
}

impl Document {
    /// Wraps a text declared in `language`.
    #[must_use]
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            language,
        }
    }

    /// Raw text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Declared language.
    #[must_use]
    pub const fn language(&self) -> &Language {
        &self.language
    }
}

/// Document-wide reading of the dominant signifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalReading {
    /// Global S1, or `?`.
    pub s1: String,
    /// Centrality share of S1.
    pub share: f64,
    /// Occurrences of S1.
    pub count: usize,
    /// Qualifying tokens in the document.
    pub total_terms: usize,
    /// Most frequent lemmas with their counts.
    pub top_terms: Vec<(String, usize)>,
    /// Lemmas most often found near S1.
    pub loop_terms: Vec<String>,
    /// Mean polarity of the sentences mentioning S1.
    pub polarity: Option<f64>,
    /// Label of `polarity`; neutral when S1 never occurs in a sentence.
    pub polarity_label: PolarityLabel,
}

/// One block of the seismograph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockReading {
    /// 0-based index.
    pub index: usize,
    /// Sentence indices covered.
    pub sentences: Range<usize>,
    /// Block S1, or `?`.
    pub s1: String,
    /// Centrality share of the block S1.
    pub share: f64,
    /// Block polarity.
    pub polarity: f64,
    /// Regime assigned to the block.
    pub regime: Regime,
}

/// Full output of one analysis. Carries everything downstream readers need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscourseAnalysis {
    /// Run id.
    pub id: Uuid,
    /// When the run finished.
    pub analyzed_at: DateTime<Utc>,
    /// Declared language.
    pub language: Language,
    /// Sentences per block.
    pub block_size: usize,
    /// Sentences found by the segmenter.
    pub sentence_count: usize,
    /// Document-wide reading.
    pub global: GlobalReading,
    /// Global centrality index.
    pub psi: PsiReport,
    /// First-person pronoun balance.
    pub pronouns: PronounCounts,
    /// Per-block readings.
    pub blocks: Vec<BlockReading>,
    /// S1 history, regimes, polarities and key moments.
    pub trace: SeismographTrace,
    /// Advisory conditions met during the run.
    pub warnings: Vec<AnalysisWarning>,
}

impl DiscourseAnalysis {
    /// Whether the document had any qualifying token.
    #[must_use]
    pub fn has_signal(&self) -> bool {
        !self.warnings.contains(&AnalysisWarning::NoSignal)
    }
}

// Collaborator languages after fallback.
struct ResolvedLanguages {
    segmenter: Language,
    annotator: Language,
    sentiment: Language,
}

/// Runs the discourse pipeline against injected collaborators.
pub struct DiscourseAnalyzer {
    config: AnalysisConfig,
    block_size: NonZeroUsize,
    resources: LinguisticResources,
    normalizer: LexicalNormalizer,
    extractor: TermExtractor,
    psi: Box<dyn PsiStrategy>,
    telemetry: Option<DiscourseTelemetry>,
}

impl fmt::Debug for DiscourseAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscourseAnalyzer")
            .field("config", &self.config)
            .field("resources", &self.resources)
            .field("psi", &self.psi.method())
            .finish_non_exhaustive()
    }
}

impl DiscourseAnalyzer {
    /// Validates `config` and prepares the pipeline.
    pub fn new(
        config: AnalysisConfig,
        resources: LinguisticResources,
    ) -> Result<Self, DiscourseError> {
        config.validate()?;
        let block_size = config.block_size()?;
        let normalizer = LexicalNormalizer::with_extra(&config.extra_oral_artifacts)?;
        Ok(Self {
            block_size,
            resources,
            normalizer,
            extractor: TermExtractor::new(config.min_term_chars),
            psi: config.psi_method.strategy(),
            telemetry: None,
            config,
        })
    }

    /// Attaches telemetry.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: DiscourseTelemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyzes one document. Degenerate input yields sentinel readings;
    /// only a collaborator that cannot run at all is an error.
    pub fn analyze(&self, document: &Document) -> Result<DiscourseAnalysis, DiscourseError> {
        let language = document.language();
        self.log(
            LogLevel::Info,
            "discourse.analysis.start",
            json!({
                "language": language.code(),
                "chars": document.text().chars().count(),
                "block_size": self.block_size.get(),
                "psi_method": self.psi.method().as_str(),
            }),
        );

        let mut warnings = Vec::new();
        if let Some(warning) = self.check_language(document) {
            warnings.push(warning);
        }
        let resolved = self.resolve_languages(language, &mut warnings)?;

        let normalized = self.normalizer.normalize(document.text());
        let tokens = self
            .resources
            .annotator
            .annotate(&normalized, &resolved.annotator)?;
        let lemmas = self.extractor.qualifying_lemmas(&tokens);
        let global = DominantTerm::from_frequencies(TermFrequencies::from_lemmas(lemmas.clone()));
        let pronouns = count_pronouns(document.text(), language);

        let sentences = self
            .resources
            .segmenter
            .segment(document.text(), &resolved.segmenter)?;
        let polarity = PolarityAdapter::new(
            self.resources.sentiment.clone(),
            resolved.sentiment,
            self.config.positive_threshold,
            self.config.negative_threshold,
        );
        let s1_polarity = if global.is_sentinel() {
            None
        } else {
            polarity.signifier_score(&sentences, &global.s1)
        };

        let blocks = partition(&sentences, self.block_size);
        // Block features do not depend on history; only recording is ordered.
        let observations = blocks
            .iter()
            .map(|block| self.observe(block, &resolved.annotator, &polarity))
            .collect::<Result<Vec<_>, DiscourseError>>()?;

        let mut seismograph = Seismograph::new(
            RegimeClassifier::new(
                self.config.history_window,
                self.config.positive_threshold,
                self.config.negative_threshold,
            ),
            RuptureDetector::new(self.config.excerpt_chars),
        );
        let mut readings = Vec::with_capacity(blocks.len());
        for (block, (observation, share)) in blocks.iter().zip(observations) {
            let regime = seismograph.record(&observation);
            tracing::debug!(
                block = block.index,
                s1 = %observation.s1,
                polarity = observation.polarity,
                regime = %regime,
                "block classified"
            );
            readings.push(BlockReading {
                index: block.index,
                sentences: block.sentences.clone(),
                s1: observation.s1,
                share,
                polarity: observation.polarity,
                regime,
            });
        }

        let psi = self.psi.compute(&PsiInput {
            s1: &global.s1,
            share: global.share,
            count: global.count,
            total: global.total,
            s1_history: seismograph.s1_history(),
        });
        let trace = seismograph.finish();

        let loop_terms = if global.is_sentinel() {
            Vec::new()
        } else {
            cooccurrences(&lemmas, &global.s1, LOOP_WINDOW, LOOP_TERMS)
        };
        if global.is_sentinel() {
            warnings.push(AnalysisWarning::NoSignal);
        }
        let reading = GlobalReading {
            top_terms: global.frequencies.top(TOP_TERMS),
            loop_terms,
            polarity_label: s1_polarity
                .map_or(PolarityLabel::Neutral, |score| polarity.label(score)),
            polarity: s1_polarity,
            s1: global.s1,
            share: global.share,
            count: global.count,
            total_terms: global.total,
        };

        let analysis = DiscourseAnalysis {
            id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            language: language.clone(),
            block_size: self.block_size.get(),
            sentence_count: sentences.len(),
            global: reading,
            psi,
            pronouns,
            blocks: readings,
            trace,
            warnings,
        };
        self.report(&analysis);
        Ok(analysis)
    }

    fn observe(
        &self,
        block: &Block,
        annotator_language: &Language,
        polarity: &PolarityAdapter,
    ) -> Result<(BlockObservation, f64), DiscourseError> {
        let normalized = self.normalizer.normalize(&block.text);
        let tokens = self
            .resources
            .annotator
            .annotate(&normalized, annotator_language)?;
        let dominant = self.extractor.extract(&tokens);
        Ok((
            BlockObservation {
                index: block.index,
                s1: dominant.s1,
                polarity: polarity.score(&block.text),
                text: block.text.clone(),
            },
            dominant.share,
        ))
    }

    fn check_language(&self, document: &Document) -> Option<AnalysisWarning> {
        let identifier = self.resources.identifier.as_ref()?;
        let sample: String = document
            .text()
            .chars()
            .take(self.config.detection_sample_chars)
            .collect();
        let detected = identifier.detect(&sample)?;
        if document.language().matches_code(&detected) {
            return None;
        }
        Some(AnalysisWarning::LanguageMismatch {
            declared: document.language().code().to_string(),
            detected,
        })
    }

    fn resolve_languages(
        &self,
        requested: &Language,
        warnings: &mut Vec<AnalysisWarning>,
    ) -> Result<ResolvedLanguages, DiscourseError> {
        let fallback = Language::default();
        let segmenter = self.resources.segmenter.as_ref();
        let segmenter_language = if segmenter.supports(requested) {
            requested.clone()
        } else if *requested != fallback && segmenter.supports(&fallback) {
            warnings.push(fallback_warning(Collaborator::Segmenter, requested));
            fallback.clone()
        } else {
            return Err(DiscourseError::SegmentationUnavailable {
                language: requested.code().to_string(),
            });
        };
        let annotator_language = pick(
            self.resources.annotator.supports(requested),
            Collaborator::Annotator,
            requested,
            warnings,
        );
        let sentiment_language = pick(
            self.resources.sentiment.supports(requested),
            Collaborator::SentimentScorer,
            requested,
            warnings,
        );
        Ok(ResolvedLanguages {
            segmenter: segmenter_language,
            annotator: annotator_language,
            sentiment: sentiment_language,
        })
    }

    fn report(&self, analysis: &DiscourseAnalysis) {
        let Some(tel) = &self.telemetry else {
            return;
        };
        for warning in &analysis.warnings {
            let _ = tel.log(
                LogLevel::Warn,
                "discourse.analysis.warning",
                json!({
                    "analysis_id": analysis.id,
                    "kind": warning.key(),
                    "detail": warning.to_string(),
                }),
            );
        }
        for moment in &analysis.trace.key_moments {
            let _ = tel.event(
                "discourse.rupture.detected",
                json!({
                    "analysis_id": analysis.id,
                    "block": moment.ordinal,
                    "s1": moment.s1,
                    "from": moment.previous_regime.label(),
                    "to": moment.regime.label(),
                    "polarity": moment.polarity,
                }),
            );
        }
        let summary = json!({
            "analysis_id": analysis.id,
            "s1": analysis.global.s1,
            "psi": analysis.psi.value,
            "psi_method": analysis.psi.method.as_str(),
            "sentences": analysis.sentence_count,
            "blocks": analysis.blocks.len(),
            "key_moments": analysis.trace.key_moments.len(),
            "warnings": analysis.warnings.len(),
        });
        let _ = tel.log(LogLevel::Info, "discourse.analysis.completed", summary.clone());
        let _ = tel.event("discourse.analysis.completed", summary);
    }

    fn log(&self, level: LogLevel, message: &str, metadata: serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(level, message, metadata);
        }
    }
}

fn fallback_warning(collaborator: Collaborator, requested: &Language) -> AnalysisWarning {
    AnalysisWarning::CollaboratorFallback {
        collaborator,
        requested: requested.clone(),
        used: Language::default(),
    }
}

// Annotator and scorer are still asked to run when the fallback is
// unsupported too; their own error or neutral score then stands.
fn pick(
    supported: bool,
    collaborator: Collaborator,
    requested: &Language,
    warnings: &mut Vec<AnalysisWarning>,
) -> Language {
    if supported || *requested == Language::default() {
        return requested.clone();
    }
    warnings.push(fallback_warning(collaborator, requested));
    Language::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::psi::{PsiMethod, PsiScale};

    fn analyzer() -> DiscourseAnalyzer {
        DiscourseAnalyzer::new(AnalysisConfig::default(), LinguisticResources::default()).unwrap()
    }

    const SPEECH: &str = "Le travail est notre avenir. Le travail libère la France. \
        Nous croyons au travail. Je défends le travail avec fierté. \
        Le travail est une victoire. Le travail unit le peuple. \
        Mais la crise menace. La crise détruit les emplois. \
        La crise frappe les familles. La peur gagne. \
        La crise est terrible. Nous refusons la crise.";

    #[test]
    fn french_speech_end_to_end() {
        let analysis = analyzer()
            .analyze(&Document::new(SPEECH, Language::French))
            .unwrap();
        assert_eq!(analysis.sentence_count, 12);
        assert_eq!(analysis.blocks.len(), 2);
        assert_eq!(analysis.trace.s1_history, vec!["travail", "crise"]);
        assert_eq!(analysis.global.s1, "travail");
        assert_eq!(analysis.global.count, 6);
        assert_eq!(analysis.trace.regimes[0], Regime::Unknown);
        assert_eq!(analysis.trace.regimes[1], Regime::Centrifugal);
        assert!(analysis.trace.key_moments.is_empty());
        assert_eq!(analysis.pronouns.singular, 1);
        assert_eq!(analysis.pronouns.plural, 2);
        assert_eq!(analysis.global.polarity_label, PolarityLabel::Positive);
        assert_eq!(analysis.psi.scale, PsiScale::Percent);
        assert!(analysis.psi.meaningful);
        assert!(analysis.warnings.is_empty(), "{:?}", analysis.warnings);
        assert!(analysis.has_signal());
    }

    #[test]
    fn empty_document_is_not_an_error() {
        let analysis = analyzer()
            .analyze(&Document::new("", Language::French))
            .unwrap();
        assert_eq!(analysis.global.s1, "?");
        assert_eq!(analysis.sentence_count, 0);
        assert!(analysis.blocks.is_empty());
        assert!(analysis.trace.key_moments.is_empty());
        assert!(!analysis.psi.meaningful);
        assert_eq!(analysis.warnings, vec![AnalysisWarning::NoSignal]);
        assert_eq!(analysis.global.polarity_label, PolarityLabel::Neutral);
    }

    #[test]
    fn unsupported_language_falls_back_with_warnings() {
        let analysis = analyzer()
            .analyze(&Document::new(SPEECH, Language::parse("de")))
            .unwrap();
        let fallbacks: Vec<Collaborator> = analysis
            .warnings
            .iter()
            .filter_map(|warning| match warning {
                AnalysisWarning::CollaboratorFallback { collaborator, .. } => Some(*collaborator),
                _ => None,
            })
            .collect();
        assert_eq!(
            fallbacks,
            vec![
                Collaborator::Segmenter,
                Collaborator::Annotator,
                Collaborator::SentimentScorer
            ]
        );
        assert!(analysis.warnings.iter().any(|w| matches!(
            w,
            AnalysisWarning::LanguageMismatch { detected, .. } if detected == "fr"
        )));
        assert_eq!(analysis.global.s1, "travail");
    }

    #[test]
    fn apostrophe_fragments_never_win_s1() {
        let english = analyzer()
            .analyze(&Document::new(
                "We don't surrender. We don't retreat. We don't doubt freedom. Freedom matters.",
                Language::English,
            ))
            .unwrap();
        assert_eq!(english.global.s1, "freedom");
        assert_eq!(english.global.count, 2);
        assert!(english.global.top_terms.iter().all(|(term, _)| term != "don"));

        let french = analyzer()
            .analyze(&Document::new(
                "Aujourd'hui la France avance. Aujourd'hui la France gagne. \
                 Aujourd\u{2019}hui la France espère.",
                Language::French,
            ))
            .unwrap();
        assert_eq!(french.global.s1, "france");
        assert_eq!(french.global.count, 3);
        assert!(french
            .global
            .top_terms
            .iter()
            .all(|(term, _)| term != "aujourd" && term != "hui"));
    }

    #[test]
    fn psi_method_follows_config() {
        let config = AnalysisConfig {
            psi_method: PsiMethod::MaxShareFraction,
            block_size: 3,
            ..AnalysisConfig::default()
        };
        let analysis = DiscourseAnalyzer::new(config, LinguisticResources::default())
            .unwrap()
            .analyze(&Document::new(SPEECH, Language::French))
            .unwrap();
        assert_eq!(analysis.psi.method, PsiMethod::MaxShareFraction);
        assert!(analysis.psi.value > 0.0 && analysis.psi.value <= 1.0);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = AnalysisConfig {
            block_size: 0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            DiscourseAnalyzer::new(config, LinguisticResources::default()),
            Err(DiscourseError::InvalidConfig(_))
        ));
    }
}
