//! Objective readability and compliance statistics for a draft.
//!
//! Everything here is a pure function of its inputs and total over any string:
//! an empty draft produces zero counts, never an error. The judge embeds these
//! numbers in the scoring prompt as ground truth and uses them to clip the
//! model's subjective scores.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use super::normalize::WordLimit;
use super::types::IntendedUse;

/// Closing lines accepted as a calm bedtime ending.
pub const BEDTIME_TAILS: [&str; 4] = ["Good night.", "Goodnight.", "Sleep well.", "Sweet dreams."];

/// Dialogue spans beyond this count are flagged.
pub const MAX_DIALOGUE_LINES: usize = 2;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[\w']+\b").expect("word pattern is valid"));

static QUOTED_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"]+"|'[^']+'"#).expect("quoted span pattern is valid"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub word_count: usize,
    pub over_word_limit: bool,
    pub avg_sentence_len: f64,
    pub coleman_liau_index: f64,
    pub dialogue_lines: usize,
    pub dialogue_over_2: bool,
    pub missing_must_include: Vec<String>,
    pub bedtime_tail_ok: bool,
    pub intended_use: IntendedUse,
    pub word_limit: WordLimit,
}

impl Metrics {
    /// `(name, rendered value)` pairs in display order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("word_count", self.word_count.to_string()),
            ("over_word_limit", self.over_word_limit.to_string()),
            ("avg_sentence_len", format!("{:.2}", self.avg_sentence_len)),
            ("coleman_liau_index", format!("{:.2}", self.coleman_liau_index)),
            ("dialogue_lines", self.dialogue_lines.to_string()),
            ("dialogue_over_2", self.dialogue_over_2.to_string()),
            (
                "missing_must_include",
                format!("[{}]", self.missing_must_include.join(", ")),
            ),
            ("bedtime_tail_ok", self.bedtime_tail_ok.to_string()),
            ("intended_use", self.intended_use.to_string()),
            ("word_limit", self.word_limit.to_string()),
        ]
    }
}

pub fn compute_metrics(
    text: &str,
    must_include: &[String],
    intended_use: IntendedUse,
    word_limit: WordLimit,
) -> Metrics {
    let words = word_count(text);
    let dialogue = dialogue_lines(text);
    Metrics {
        word_count: words,
        over_word_limit: words > word_limit.get() as usize,
        avg_sentence_len: round2(avg_sentence_len(text)),
        coleman_liau_index: round2(coleman_liau_index(text)),
        dialogue_lines: dialogue,
        dialogue_over_2: dialogue > MAX_DIALOGUE_LINES,
        missing_must_include: missing_tokens(text, must_include),
        bedtime_tail_ok: !intended_use.is_bedtime() || has_bedtime_tail(text),
        intended_use,
        word_limit,
    }
}

/// Split on `.`, `!` and `?`, keeping each delimiter on the segment before it.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        if matches!(ch, '.' | '!' | '?') {
            let end = idx + ch.len_utf8();
            sentences.push(text[start..end].trim());
            start = end;
        }
    }
    sentences.push(text[start..].trim());
    sentences.retain(|s| !s.is_empty());
    sentences
}

pub fn word_count(text: &str) -> usize {
    WORD.find_iter(text).count()
}

pub fn letter_count(text: &str) -> usize {
    text.chars().filter(char::is_ascii_alphabetic).count()
}

/// Each quoted span counts as one line of dialogue.
pub fn dialogue_lines(text: &str) -> usize {
    QUOTED_SPAN.find_iter(text).count()
}

#[allow(clippy::cast_precision_loss)]
pub fn avg_sentence_len(text: &str) -> f64 {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return 0.0;
    }
    let words: usize = sentences.iter().map(|s| word_count(s)).sum();
    words as f64 / sentences.len() as f64
}

/// Coleman–Liau index: `0.0588·L − 0.296·S − 15.8`, with L letters and S
/// sentences per 100 words.
#[allow(clippy::cast_precision_loss)]
pub fn coleman_liau_index(text: &str) -> f64 {
    let words = word_count(text).max(1) as f64;
    let sentences = split_sentences(text).len().max(1) as f64;
    let letters_per_100 = letter_count(text) as f64 * 100.0 / words;
    let sentences_per_100 = sentences * 100.0 / words;
    0.0588 * letters_per_100 - 0.296 * sentences_per_100 - 15.8
}

pub fn has_bedtime_tail(text: &str) -> bool {
    let text = text.trim_end();
    BEDTIME_TAILS.iter().any(|tail| text.ends_with(tail))
}

/// Required tokens (trimmed, lowercased) that do not occur anywhere in `text`.
pub fn missing_tokens(text: &str, tokens: &[String]) -> Vec<String> {
    let haystack = text.to_lowercase();
    tokens
        .iter()
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty() && !haystack.contains(token.as_str()))
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
