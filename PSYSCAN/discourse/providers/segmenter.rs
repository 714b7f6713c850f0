use std::collections::{HashMap, HashSet};

use crate::{error::DiscourseError, language::Language, providers::SentenceSegmenter};

/// Boundary rules for one language.
#[derive(Debug, Clone)]
pub struct SegmentationRules {
    terminators: Vec<char>,
    abbreviations: HashSet<String>,
    // Single capitals that are words of their own, never initials.
    standalone_letters: Vec<char>,
}

impl SegmentationRules {
    /// Rules ending sentences on `terminators`, except after the listed
    /// abbreviations (lowercase, without the final dot).
    #[must_use]
    pub fn new<I, S>(terminators: &[char], abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terminators: terminators.to_vec(),
            abbreviations: abbreviations.into_iter().map(Into::into).collect(),
            standalone_letters: Vec::new(),
        }
    }

    /// Capital letters that end a sentence like any word (English `I`)
    /// instead of reading as initials.
    #[must_use]
    pub fn with_standalone_letters(mut self, letters: &[char]) -> Self {
        self.standalone_letters = letters.to_vec();
        self
    }

    /// French rules.
    #[must_use]
    pub fn french() -> Self {
        Self::new(
            &['.', '!', '?', '…'],
            [
                "m", "mm", "mme", "mmes", "mlle", "dr", "pr", "me", "st", "ste", "etc", "cf",
                "p", "art", "av", "bd", "env", "ex", "fig", "vol", "chap",
            ],
        )
    }

    /// English rules.
    #[must_use]
    pub fn english() -> Self {
        Self::new(
            &['.', '!', '?', '…'],
            [
                "mr", "mrs", "ms", "dr", "prof", "st", "jr", "sr", "vs", "etc", "e.g", "i.e",
                "u.s", "u.k", "inc", "ltd", "co", "no", "fig", "gen", "gov", "sen", "rep",
            ],
        )
        .with_standalone_letters(&['I'])
    }

    fn is_terminator(&self, ch: char) -> bool {
        self.terminators.contains(&ch)
    }

    /// Whether the word ending right before a `.` keeps the sentence open.
    fn suppresses_boundary(&self, word: &str) -> bool {
        let word = word.trim_start_matches(|c: char| !c.is_alphanumeric());
        let mut letters = word.chars();
        let single_initial = matches!(
            (letters.next(), letters.next()),
            (Some(c), None) if c.is_uppercase() && !self.standalone_letters.contains(&c)
        );
        single_initial || self.abbreviations.contains(&word.to_lowercase())
    }
}

/// Punctuation-driven segmenter with per-language abbreviation lists.
/// Languages without rules use the default language's rules.
#[derive(Debug, Clone)]
pub struct RuleSentenceSegmenter {
    rules: HashMap<Language, SegmentationRules>,
}

impl RuleSentenceSegmenter {
    /// Segmenter restricted to the given rule table.
    #[must_use]
    pub const fn with_rules(rules: HashMap<Language, SegmentationRules>) -> Self {
        Self { rules }
    }

    fn split(rules: &SegmentationRules, text: &str) -> Vec<String> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut i = 0;
        while i < chars.len() {
            let (offset, ch) = chars[i];
            if !rules.is_terminator(ch) {
                i += 1;
                continue;
            }
            // Swallow runs like `?!`, `...` and closing quotes/brackets.
            let mut end = i + 1;
            while end < chars.len()
                && (rules.is_terminator(chars[end].1) || is_closer(chars[end].1))
            {
                end += 1;
            }
            let at_gap = end == chars.len() || chars[end].1.is_whitespace();
            let single_dot = ch == '.' && end == i + 1;
            let abbreviated = single_dot && {
                let head = &text[start..offset];
                let word = head.rsplit(char::is_whitespace).next().unwrap_or("");
                rules.suppresses_boundary(word)
            };
            if at_gap && !abbreviated {
                let cut = chars.get(end).map_or(text.len(), |(pos, _)| *pos);
                push_sentence(&mut sentences, &text[start..cut]);
                start = cut;
            }
            i = end;
        }
        push_sentence(&mut sentences, &text[start..]);
        sentences
    }
}

impl Default for RuleSentenceSegmenter {
    fn default() -> Self {
        let mut rules = HashMap::new();
        rules.insert(Language::French, SegmentationRules::french());
        rules.insert(Language::English, SegmentationRules::english());
        Self::with_rules(rules)
    }
}

impl SentenceSegmenter for RuleSentenceSegmenter {
    fn supports(&self, language: &Language) -> bool {
        self.rules.contains_key(language)
    }

    fn segment(&self, text: &str, language: &Language) -> Result<Vec<String>, DiscourseError> {
        let rules = self
            .rules
            .get(language)
            .or_else(|| self.rules.get(&Language::default()))
            .ok_or_else(|| DiscourseError::SegmentationUnavailable {
                language: language.code().to_string(),
            })?;
        Ok(Self::split(rules, text))
    }
}

fn is_closer(ch: char) -> bool {
    matches!(ch, '"' | '\'' | ')' | ']' | '»' | '”' | '’')
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let sentence = raw.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
}
