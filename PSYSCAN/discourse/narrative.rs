use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_logging::LogLevel;

use crate::{engine::DiscourseAnalysis, polarity::PolarityLabel, telemetry::DiscourseTelemetry};

/// Signifiers with a dedicated anchor phrase.
const ANCHORS: &[(&str, &str)] = &[
    ("agir", "L'ordre d'agir comme un général"),
    ("travail", "L'obsession du travail comme devoir sacré"),
    ("refuser", "Le refus comme acte de survie"),
    ("puissance", "La puissance comme prothèse verbale"),
    ("peuple", "Le peuple comme bouclier collectif"),
    ("révolution", "La révolution comme fantasme répétitif"),
    ("écologie", "L'écologie comme mantra de survie"),
    ("sécurité", "La sécurité comme armure du pouvoir"),
    ("france", "La France comme totem national"),
    ("liberté", "La liberté comme mot-piège"),
    ("égalité", "L'égalité comme promesse répétée"),
    ("réforme", "La réforme comme fuite en avant"),
    ("crise", "La crise comme justification permanente"),
    ("avenir", "L'avenir comme horizon vide"),
];

/// Verdict on the power structure, read from Psi on the 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerIcon {
    /// Psi above 90.
    Forclusion,
    /// Psi above 80.
    Surregime,
    /// Psi above 65.
    Attention,
    /// Psi from 50 to 65.
    Stable,
    /// Psi below 50.
    Confiance,
}

impl PowerIcon {
    /// Classifies a 0-100 Psi value.
    #[must_use]
    pub fn from_percent(psi: f64) -> Self {
        if psi > 90.0 {
            Self::Forclusion
        } else if psi > 80.0 {
            Self::Surregime
        } else if psi > 65.0 {
            Self::Attention
        } else if psi < 50.0 {
            Self::Confiance
        } else {
            Self::Stable
        }
    }

    /// Upper-case label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Forclusion => "FORCLUSION",
            Self::Surregime => "SURRÉGIME",
            Self::Attention => "ATTENTION",
            Self::Stable => "STABLE",
            Self::Confiance => "CONFIANCE",
        }
    }

    /// Closing sentence attached to the verdict.
    #[must_use]
    pub const fn conclusion(self) -> &'static str {
        match self {
            Self::Forclusion => "Un pouvoir en forclusion, le réel est nié.",
            Self::Surregime => "Un pouvoir en surrégime, prêt à l'implosion.",
            Self::Attention => "Un pouvoir fragile, tenu par un fil.",
            Self::Stable | Self::Confiance => {
                "Un pouvoir fondé sur le Réel, et non sur la répétition."
            }
        }
    }
}

/// How the speaker's `je` relates to the collective `nous`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fissure {
    /// `nous` over three times `je`.
    NousDominant,
    /// No `je` at all.
    JeAbsent,
    /// Balanced pronouns under a moderate Psi.
    Maturite,
    /// Anything else.
    JeIsole,
}

impl Fissure {
    /// Classifies pronoun counts against Psi (0-100).
    #[must_use]
    pub fn classify(singular: usize, ratio: f64, psi: f64) -> Self {
        if ratio > 3.0 {
            Self::NousDominant
        } else if singular == 0 {
            Self::JeAbsent
        } else if (0.7..=1.3).contains(&ratio) && psi < 60.0 {
            Self::Maturite
        } else {
            Self::JeIsole
        }
    }

    /// Corpus phrase.
    #[must_use]
    pub const fn phrase(self) -> &'static str {
        match self {
            Self::NousDominant => {
                "Un sujet dissous dans le corps social pour éviter la singularité."
            }
            Self::JeIsole => "Un leader qui se cache derrière son mot fétiche.",
            Self::JeAbsent => "Un sujet effacé, remplacé par un 'nous' totalitaire.",
            Self::Maturite => "Un leader qui endosse le 'Je' pour mieux engager le 'Nous'.",
        }
    }
}

/// Leadership project read from the volume of `nous`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadershipProject {
    /// Direction without fusional adhesion.
    MaitriseDirecte,
    /// Over ten `nous`.
    SutureSociale,
}

impl LeadershipProject {
    /// Classifies a `nous` count.
    #[must_use]
    pub const fn classify(plural: usize) -> Self {
        if plural > 10 {
            Self::SutureSociale
        } else {
            Self::MaitriseDirecte
        }
    }

    /// Corpus phrase.
    #[must_use]
    pub const fn phrase(self) -> &'static str {
        match self {
            Self::MaitriseDirecte => {
                "Affirmer une direction sans le besoin de l'adhésion fusionnelle."
            }
            Self::SutureSociale => {
                "Tenter de masquer la fragilité individuelle par la force du nombre."
            }
        }
    }
}

/// What the discourse cannot afford to lose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dependency {
    /// Psi below 50.
    Equilibre,
    /// S1 is `refuser`.
    RefusActif,
    /// S1 framed favorably.
    Positif,
    /// S1 framed unfavorably.
    Negatif,
    /// Neutral framing.
    Action,
}

impl Dependency {
    /// Classifies Psi (0-100), S1 and its polarity label.
    #[must_use]
    pub fn classify(psi: f64, s1: &str, polarity: PolarityLabel) -> Self {
        if psi < 50.0 {
            Self::Equilibre
        } else if s1 == "refuser" {
            Self::RefusActif
        } else {
            match polarity {
                PolarityLabel::Positive => Self::Positif,
                PolarityLabel::Negative => Self::Negatif,
                PolarityLabel::Neutral => Self::Action,
            }
        }
    }

    /// Corpus phrase, with `s1` filled in where the phrase names it.
    #[must_use]
    pub fn phrase(self, s1: &str) -> String {
        match self {
            Self::Equilibre => {
                "Le mot-clé est intégré et son échec est géré par la structure.".to_string()
            }
            Self::RefusActif => {
                "Si la contestation s'organise, l'identité discursive s'effondre.".to_string()
            }
            Self::Positif => format!("Si {s1} est détourné·e, le mythe vacille."),
            Self::Negatif => format!("Si {s1} n'est pas surmonté·e, tout s'effondre."),
            Self::Action => "Si l'action échoue, le discours devient ridicule.".to_string(),
        }
    }
}

/// Main risk of the narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Risk {
    /// Hangs on the speaker.
    Personne,
    /// `nous` over twice `je`.
    Institution,
}

impl Risk {
    /// Classifies pronoun counts.
    #[must_use]
    pub const fn classify(singular: usize, plural: usize) -> Self {
        if plural > singular.saturating_mul(2) {
            Self::Institution
        } else {
            Self::Personne
        }
    }

    /// Corpus phrase.
    #[must_use]
    pub const fn phrase(self) -> &'static str {
        match self {
            Self::Personne | Self::Institution => {
                "Un système qui s'est rendu dépendant de l'Homme-Providence."
            }
        }
    }
}

/// Structured interpretive reading of one analysis. Carries no layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeReading {
    /// Global S1.
    pub s1: String,
    /// Anchor phrase for S1.
    pub anchor: String,
    /// S1 centrality, whole percent.
    pub centrality_percent: u32,
    /// Verdict from Psi.
    pub icon: PowerIcon,
    /// Pronoun fissure.
    pub fissure: Fissure,
    /// Leadership project.
    pub project: LeadershipProject,
    /// How many times S1 is repeated.
    pub ritual_count: usize,
    /// Critical dependency.
    pub dependency: Dependency,
    /// Main risk.
    pub risk: Risk,
    /// Polarity label of S1.
    pub polarity: PolarityLabel,
}

impl NarrativeReading {
    /// Dependency phrase with S1 filled in.
    #[must_use]
    pub fn dependency_phrase(&self) -> String {
        self.dependency.phrase(&self.s1)
    }
}

/// Anchor phrase for `s1`, or the generic one.
#[must_use]
pub fn anchor_phrase(s1: &str) -> String {
    ANCHORS
        .iter()
        .find(|(signifier, _)| *signifier == s1)
        .map_or_else(
            || format!("L'obsession de « {s1} » comme acte de pouvoir"),
            |(_, phrase)| (*phrase).to_string(),
        )
}

/// Builds narrative readings from analysis output alone.
#[derive(Debug, Clone, Default)]
pub struct NarrativeComposer {
    telemetry: Option<DiscourseTelemetry>,
}

impl NarrativeComposer {
    /// Creates a composer.
    #[must_use]
    pub const fn new(telemetry: Option<DiscourseTelemetry>) -> Self {
        Self { telemetry }
    }

    /// Reads `analysis`.
    #[must_use]
    pub fn compose(&self, analysis: &DiscourseAnalysis) -> NarrativeReading {
        let psi = analysis.psi.percent();
        let global = &analysis.global;
        let pronouns = analysis.pronouns;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let centrality_percent = (global.share * 100.0).clamp(0.0, 100.0) as u32;
        let reading = NarrativeReading {
            s1: global.s1.clone(),
            anchor: anchor_phrase(&global.s1),
            centrality_percent,
            icon: PowerIcon::from_percent(psi),
            fissure: Fissure::classify(pronouns.singular, pronouns.ratio, psi),
            project: LeadershipProject::classify(pronouns.plural),
            ritual_count: global.count,
            dependency: Dependency::classify(psi, &global.s1, global.polarity_label),
            risk: Risk::classify(pronouns.singular, pronouns.plural),
            polarity: global.polarity_label,
        };
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(
                LogLevel::Info,
                "discourse.narrative.composed",
                json!({
                    "analysis_id": analysis.id,
                    "icon": reading.icon.label(),
                    "psi": psi,
                }),
            );
        }
        reading
    }
}
