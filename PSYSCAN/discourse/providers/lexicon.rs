use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::language::Language;

/// Word tokens, keeping apostrophe-joined forms (`l'avenir`, `don't`) whole.
pub static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+(?:['’]\w+)*").expect("word pattern"));

static STOPWORDS_FR: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "le", "la", "les", "de", "du", "des", "un", "une", "et", "ou", "à", "au", "aux", "en",
        "dans", "sur", "pour", "par", "avec", "sans", "sous", "vers", "depuis", "après", "avant",
        "pendant", "entre", "contre", "chez", "mais", "car", "que", "qui", "quoi", "dont", "où",
        "quand", "comment", "pourquoi", "si", "est", "sont", "était", "sera", "serons", "été",
        "a", "ont", "avait", "avoir", "être", "fait", "faire", "tout", "tous", "toute",
        "toutes", "plus", "moins", "très", "trop", "peu", "assez", "aussi", "encore", "déjà",
        "toujours", "jamais", "souvent", "parfois", "bientôt", "hier", "aujourd'hui",
        "aujourd’hui", "demain", "maintenant", "alors", "donc", "ni", "comme", "lorsque",
        "puisque", "afin", "parce", "même", "seulement", "surtout", "ainsi", "enfin", "bref",
        "voici", "voilà", "cependant", "néanmoins", "pourtant", "toutefois", "je", "tu", "il",
        "elle", "on", "nous", "vous", "ils", "elles", "me", "te", "se", "lui", "leur", "leurs",
        "mon", "ma", "mes", "ton", "ta", "tes", "son", "sa", "ses", "notre", "nos", "votre",
        "vos", "ce", "cet", "cette", "ces", "cela", "ça", "ceci", "celui", "celle", "ceux",
        "celles", "ne", "pas", "non", "oui", "y", "ici", "là", "rien", "chaque", "autre",
        "autres", "quel", "quelle", "quels", "quelles", "peut", "doit", "va", "vont",
        // Elided heads left over once apostrophes are spaced out.
        "aujourd", "hui", "presqu", "quelqu", "lorsqu", "puisqu", "jusqu",
    ]
    .into_iter()
    .collect()
});

static STOPWORDS_EN: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "is", "it",
        "that", "this", "with", "as", "by", "from", "was", "were", "are", "be", "been", "has",
        "have", "had", "not", "no", "do", "does", "did", "will", "would", "could", "should",
        "can", "may", "might", "if", "then", "than", "so", "up", "out", "about", "into",
        "over", "after", "before", "between", "through", "just", "also", "very", "more",
        "most", "some", "any", "each", "every", "all", "both", "few", "other", "such", "only",
        "own", "same", "too", "how", "what", "which", "who", "when", "where", "why", "i", "me",
        "my", "we", "us", "our", "ours", "you", "your", "he", "him", "his", "she", "her",
        "they", "them", "their", "its", "there", "here", "these", "those", "am", "being",
        "now", "must", "shall", "let", "yes",
        // Contraction stems left over once apostrophes are spaced out.
        "don", "isn", "doesn", "didn", "wasn", "weren", "won", "aren", "couldn", "shouldn",
        "wouldn", "hasn", "haven", "hadn", "ll", "ve", "re",
    ]
    .into_iter()
    .collect()
});

static POLARITY_FR: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("bon", 0.7), ("bonne", 0.7), ("bien", 0.5), ("grand", 0.4), ("grande", 0.4),
        ("beau", 0.8), ("belle", 0.8), ("fier", 0.6), ("fière", 0.6), ("heureux", 0.8),
        ("heureuse", 0.8), ("espoir", 0.6), ("confiance", 0.5), ("paix", 0.6), ("liberté", 0.5),
        ("victoire", 0.7), ("réussite", 0.7), ("progrès", 0.5), ("force", 0.3), ("fort", 0.4),
        ("forte", 0.4), ("juste", 0.4), ("justice", 0.4), ("prospérité", 0.7), ("avenir", 0.2),
        ("ensemble", 0.3), ("solidarité", 0.5), ("excellent", 0.9), ("magnifique", 0.9),
        ("merci", 0.5), ("sûr", 0.3), ("protéger", 0.3), ("gagner", 0.5), ("honneur", 0.5),
        ("mauvais", -0.7), ("mauvaise", -0.7), ("mal", -0.6), ("crise", -0.6), ("peur", -0.6),
        ("danger", -0.6), ("menace", -0.6), ("guerre", -0.7), ("défaite", -0.7),
        ("échec", -0.7), ("honte", -0.7), ("colère", -0.5), ("misère", -0.8),
        ("pauvreté", -0.6), ("violence", -0.7), ("injustice", -0.6), ("chômage", -0.5),
        ("terrible", -0.8), ("triste", -0.6), ("faible", -0.4), ("perdre", -0.5),
        ("détruire", -0.7), ("effondrement", -0.7), ("mort", -0.8), ("haine", -0.8),
        ("trahison", -0.8), ("désastre", -0.9), ("catastrophe", -0.9), ("difficile", -0.4),
    ]
    .into_iter()
    .collect()
});

static POLARITY_EN: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("good", 0.7), ("great", 0.8), ("best", 1.0), ("better", 0.5), ("proud", 0.6),
        ("happy", 0.8), ("hope", 0.6), ("hopeful", 0.6), ("trust", 0.5), ("peace", 0.6),
        ("freedom", 0.5), ("free", 0.4), ("victory", 0.7), ("success", 0.7),
        ("progress", 0.5), ("strong", 0.4), ("strength", 0.4), ("fair", 0.4), ("justice", 0.4),
        ("prosperity", 0.7), ("together", 0.3), ("beautiful", 0.85), ("wonderful", 1.0),
        ("excellent", 1.0), ("thank", 0.4), ("safe", 0.5), ("win", 0.6), ("honor", 0.5),
        ("bad", -0.7), ("worse", -0.6), ("worst", -1.0), ("crisis", -0.6), ("fear", -0.6),
        ("danger", -0.6), ("threat", -0.6), ("war", -0.7), ("defeat", -0.7),
        ("failure", -0.7), ("shame", -0.7), ("anger", -0.5), ("poverty", -0.6),
        ("violence", -0.7), ("injustice", -0.6), ("unemployment", -0.5), ("terrible", -1.0),
        ("sad", -0.5), ("weak", -0.4), ("lose", -0.5), ("destroy", -0.7), ("collapse", -0.7),
        ("death", -0.8), ("hate", -0.8), ("betrayal", -0.8), ("disaster", -0.9),
        ("catastrophe", -0.9), ("difficult", -0.4), ("corrupt", -0.7),
    ]
    .into_iter()
    .collect()
});

static NEGATIONS_FR: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["ne", "n", "pas", "jamais", "aucun", "aucune", "rien", "sans", "ni"]
        .into_iter()
        .collect()
});

static NEGATIONS_EN: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["not", "no", "never", "nothing", "without", "nor"].into_iter().collect());

static INTENSIFIERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["très", "vraiment", "extrêmement", "profondément", "very", "really", "extremely", "deeply"]
        .into_iter()
        .collect()
});

/// Built-in stopword list for the lexicon language of `language`.
#[must_use]
pub fn stopwords(language: &Language) -> &'static HashSet<&'static str> {
    match language.lexicon_language() {
        Language::English => &*STOPWORDS_EN,
        _ => &*STOPWORDS_FR,
    }
}

/// Built-in polarity table for the lexicon language of `language`.
#[must_use]
pub fn polarity_table(language: &Language) -> &'static HashMap<&'static str, f64> {
    match language.lexicon_language() {
        Language::English => &*POLARITY_EN,
        _ => &*POLARITY_FR,
    }
}

/// Whether `word` (lowercase) negates what follows.
#[must_use]
pub fn is_negation(word: &str, language: &Language) -> bool {
    match language.lexicon_language() {
        Language::English => NEGATIONS_EN.contains(word) || word.ends_with("n't"),
        _ => NEGATIONS_FR.contains(word),
    }
}

/// Whether `word` (lowercase) amplifies what follows.
#[must_use]
pub fn is_intensifier(word: &str) -> bool {
    INTENSIFIERS.contains(word)
}
