//! Raw transcript cleaning.
//!
//! Speech recognizers emit text with stutter artifacts ("I think I think
//! that…"), re-recognized near-duplicate sentences, runs of hesitation
//! fillers, and sloppy casing/spacing. This module turns that raw text into
//! a clean transcript while reporting the fillers that were actually said.
//!
//! # Design
//!
//! - Stages run in a fixed order: whitespace compaction, sentence
//!   segmentation, duplicate/near-duplicate collapsing, filler-run
//!   collapsing, capitalization/punctuation repair.
//! - Near-duplicate collapsing compares each sentence against the
//!   immediately preceding kept sentence only, keeping the walk O(n).
//! - Filler extraction for reporting runs on the original raw text before
//!   collapsing; the returned `text` reflects the cleaned version.
//! - Never errors: malformed or empty input degrades to the empty record.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::NormalizeConfig;
use crate::error::{BpError, BpResult};
use crate::model::NormalizedTranscript;

/// Word tokens: alphanumeric runs with internal apostrophes ("don't").
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9]+(?:['’][A-Za-z0-9]+)*").expect("word pattern is valid")
});

/// Whitespace preceding closing punctuation ("word ," -> "word,").
static SPACE_BEFORE_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([,.;:!?])").expect("punctuation pattern is valid"));

/// A lowercase standalone pronoun "i" (also the "i" of "i'm", "i've").
static STANDALONE_I_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bi\b").expect("pronoun pattern is valid"));

/// Count word tokens in `text`.
#[must_use]
pub fn count_words(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}

// ---------------------------------------------------------------------------
// FillerMatcher
// ---------------------------------------------------------------------------

/// Compiled filler lexicon.
///
/// Built once from a [`NormalizeConfig`] and shared by the normalizer and
/// the feature extractor (which recounts residual fillers after collapsing).
#[derive(Debug, Clone)]
pub struct FillerMatcher {
    any: Regex,
    runs: Vec<Regex>,
}

impl FillerMatcher {
    /// Compile the lexicon into match/collapse patterns.
    pub fn compile(config: &NormalizeConfig) -> BpResult<Self> {
        let mut patterns: Vec<String> = Vec::new();
        for filler in &config.elongated_fillers {
            patterns.push(elongated_pattern(filler));
        }
        for filler in &config.phrase_fillers {
            patterns.push(phrase_pattern(filler));
        }
        for filler in &config.plain_fillers {
            patterns.push(regex::escape(filler));
        }

        let any = compile_pattern(&format!(r"(?i)\b(?:{})\b", patterns.join("|")))?;
        let runs = patterns
            .iter()
            .map(|p| compile_pattern(&format!(r"(?i)\b({p})(?:[\s,.;:!?-]+(?:{p}))+\b")))
            .collect::<BpResult<Vec<_>>>()?;

        Ok(Self { any, runs })
    }

    /// Every filler occurrence in `text`, lowercased, in order of appearance.
    #[must_use]
    pub fn find_all(&self, text: &str) -> Vec<String> {
        self.any
            .find_iter(text)
            .map(|m| {
                m.as_str()
                    .to_lowercase()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    /// Number of filler occurrences in `text`.
    #[must_use]
    pub fn count(&self, text: &str) -> usize {
        self.any.find_iter(text).count()
    }

    /// Collapse runs of 2+ repetitions of the same filler (optionally
    /// separated by light punctuation/whitespace) to a single occurrence.
    /// Distinct fillers adjacent to each other are left alone.
    #[must_use]
    pub fn collapse_runs(&self, text: &str) -> String {
        let mut collapsed = text.to_owned();
        for run in &self.runs {
            collapsed = run.replace_all(&collapsed, "$1").into_owned();
        }
        collapsed
    }
}

fn compile_pattern(pattern: &str) -> BpResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| BpError::InvalidConfig(format!("filler pattern `{pattern}`: {e}")))
}

/// "um" -> `u+m+`, "hm" -> `h+m+`: each distinct letter may be elongated.
fn elongated_pattern(filler: &str) -> String {
    let mut pattern = String::new();
    let mut prev = None;
    for c in filler.chars() {
        if prev == Some(c) {
            continue;
        }
        pattern.push_str(&regex::escape(&c.to_string()));
        pattern.push('+');
        prev = Some(c);
    }
    pattern
}

/// "you know" -> `you\s+know`.
fn phrase_pattern(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Verdict of comparing a new sentence against the previous kept one.
enum Verdict {
    /// Same utterance, previous kept form wins.
    Drop,
    /// Same utterance, the new form is longer and replaces the kept one.
    Replace,
    /// Genuinely new sentence.
    Distinct,
}

pub struct Normalizer {
    config: NormalizeConfig,
    fillers: FillerMatcher,
}

impl Normalizer {
    pub fn new(config: NormalizeConfig) -> BpResult<Self> {
        let fillers = FillerMatcher::compile(&config)?;
        Ok(Self { config, fillers })
    }

    /// The compiled filler lexicon, shareable with the feature extractor.
    #[must_use]
    pub fn fillers(&self) -> &FillerMatcher {
        &self.fillers
    }

    /// Clean a raw recognizer transcript.
    ///
    /// Empty or whitespace-only input yields the zero-value record.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> NormalizedTranscript {
        if raw.trim().is_empty() {
            return NormalizedTranscript::default();
        }

        // Reporting counts reflect what was actually said.
        let filler_words = self.fillers.find_all(raw);

        let compact = compact_whitespace(raw);
        let sentences: Vec<String> = split_sentences(&compact)
            .iter()
            .map(|sentence| self.collapse_stutter(sentence))
            .collect();
        let kept = self.collapse_near_duplicates(sentences);
        let collapsed = self.fillers.collapse_runs(&kept.join(" "));
        let text = repair_text(&collapsed);

        let word_count = count_words(&text);
        let sentences = split_sentences(&text);
        debug!(
            word_count,
            sentence_count = sentences.len(),
            filler_count = filler_words.len(),
            "transcript normalized"
        );

        NormalizedTranscript {
            text,
            sentences,
            word_count,
            filler_count: filler_words.len(),
            filler_words,
        }
    }

    /// Collapse immediate repetitions of the same word group inside one
    /// sentence ("I think I think that" -> "I think that"). Longest group
    /// first, so a repeated phrase is not mistaken for repeated words.
    fn collapse_stutter(&self, sentence: &str) -> String {
        let tokens: Vec<&str> = sentence.split_whitespace().collect();
        let mut out: Vec<&str> = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let limit = self.config.max_stutter_group.min((tokens.len() - i) / 2);
            let repeat = (1..=limit)
                .rev()
                .find(|&group| groups_match(&tokens[i..i + group], &tokens[i + group..i + 2 * group]));
            match repeat {
                // Drop the first copy; the survivor is re-examined next round,
                // so runs of three or more also collapse.
                Some(group) => i += group,
                None => {
                    out.push(tokens[i]);
                    i += 1;
                }
            }
        }
        out.join(" ")
    }

    /// Walk sentences in order, comparing each against the immediately
    /// preceding kept sentence only.
    fn collapse_near_duplicates(&self, sentences: Vec<String>) -> Vec<String> {
        let mut kept: Vec<String> = Vec::new();
        for sentence in sentences {
            let verdict = match kept.last() {
                None => Verdict::Distinct,
                Some(prev) => self.judge(prev, &sentence),
            };
            match verdict {
                Verdict::Drop => {}
                Verdict::Replace => {
                    if let Some(last) = kept.last_mut() {
                        *last = sentence;
                    }
                }
                Verdict::Distinct => kept.push(sentence),
            }
        }
        kept
    }

    fn judge(&self, prev: &str, next: &str) -> Verdict {
        let a = comparison_key(prev);
        let b = comparison_key(next);
        if a == b {
            return Verdict::Drop;
        }

        let a_len = a.chars().count();
        let b_len = b.chars().count();
        let (longer, shorter) = if a_len >= b_len {
            (&a, &b)
        } else {
            (&b, &a)
        };
        let ratio_ok = (a_len.max(b_len) as f64)
            < a_len.min(b_len).max(1) as f64 * self.config.near_dup_ratio;

        let same_utterance = a.starts_with(b.as_str())
            || b.starts_with(a.as_str())
            || (ratio_ok && longer.contains(shorter.as_str()));

        if !same_utterance {
            return Verdict::Distinct;
        }
        // Same utterance re-recognized: the longer form wins.
        if b_len > a_len {
            Verdict::Replace
        } else {
            Verdict::Drop
        }
    }
}

fn compact_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split on sentence-ending punctuation followed by whitespace, retaining
/// the punctuation with the preceding sentence. Runs of terminators ("?!")
/// stay together.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|n| n.is_whitespace()) {
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
            let sentence = current.trim().to_owned();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            current.clear();
        }
    }
    let sentence = current.trim().to_owned();
    if !sentence.is_empty() {
        sentences.push(sentence);
    }
    sentences
}

/// Case-insensitive comparison key: trailing sentence terminators ignored.
fn comparison_key(sentence: &str) -> String {
    sentence
        .to_lowercase()
        .trim_end_matches(['.', '!', '?'])
        .trim()
        .to_owned()
}

/// Token comparison tolerant of trailing light punctuation ("think," vs
/// "think").
fn groups_match(a: &[&str], b: &[&str]) -> bool {
    a.iter()
        .zip(b)
        .all(|(x, y)| token_key(x).eq_ignore_ascii_case(token_key(y)))
}

fn token_key(token: &str) -> &str {
    token.trim_end_matches([',', ';', ':'])
}

/// Capitalization/punctuation repair:
/// - no whitespace immediately before `,.!?;:`;
/// - first letter of the text and of each sentence capitalized;
/// - standalone "i" capitalized.
fn repair_text(text: &str) -> String {
    let stripped = SPACE_BEFORE_PUNCT_RE.replace_all(text, "$1");

    let mut repaired = String::with_capacity(stripped.len());
    let mut capitalize_next = true;
    for c in stripped.chars() {
        if capitalize_next && c.is_alphanumeric() {
            if c.is_alphabetic() {
                repaired.extend(c.to_uppercase());
            } else {
                repaired.push(c);
            }
            capitalize_next = false;
        } else {
            repaired.push(c);
            if matches!(c, '.' | '!' | '?') {
                capitalize_next = true;
            }
        }
    }

    STANDALONE_I_RE.replace_all(&repaired, "I").into_owned()
}
