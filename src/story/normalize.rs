//! Total, side-effect-free coercions for loosely-typed model output.
//!
//! Completions come back as JSON whose field shapes drift from call to call:
//! integers arrive as `"450-600"`, lists as `"a, b; c"`, scores as `"4"` or
//! `4.6`. Each field type has exactly one normalizer here and none of them can
//! fail; unusable input falls back to a caller-supplied default.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

use super::types::MAX_SCORE;

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{2,4}").expect("digit-run pattern is valid"));

static LIST_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[;\n,]+").expect("list separator pattern is valid"));

/// Coerce a JSON value to an integer.
///
/// - integers pass through
/// - floats round to the nearest integer (ties to even)
/// - strings yield their first run of 2–4 digits (`"about 480"` -> 480)
/// - anything else yields `default`
#[must_use]
pub fn coerce_int(value: &Value, default: i64) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(round_to_i64))
            .unwrap_or(default),
        Value::String(s) => DIGIT_RUN
            .find(s)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(default),
        _ => default,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn round_to_i64(f: f64) -> Option<i64> {
    let rounded = f.round_ties_even();
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded <= i64::MAX as f64 {
        Some(rounded as i64)
    } else {
        None
    }
}

/// Coerce a JSON value to an ordered list of non-blank, trimmed strings.
#[must_use]
pub fn force_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| stringify(item).trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        Some(Value::String(s)) => {
            let parts: Vec<String> = LIST_SEPARATORS
                .split(s)
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(ToString::to_string)
                .collect();
            if parts.is_empty() && !s.trim().is_empty() {
                vec![s.trim().to_string()]
            } else {
                parts
            }
        }
        Some(other) => {
            let text = stringify(other).trim().to_string();
            if text.is_empty() { Vec::new() } else { vec![text] }
        }
    }
}

/// Coerce a rubric score. `None` means "unusable", so the criterion default applies.
#[must_use]
pub fn coerce_score(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(round_to_i64))?,
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(round_to_i64))?
        }
        _ => return None,
    };
    let clamped = raw.clamp(0, i64::from(MAX_SCORE));
    u8::try_from(clamped).ok()
}

/// Coerce a free-text field. Arrays are joined so multi-part beats survive.
#[must_use]
pub fn coerce_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| stringify(item).trim().to_string())
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => stringify(other).trim().to_string(),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ── Word limit ──────────────────────────────────────────────────

/// A story length budget in words. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WordLimit(u32);

impl WordLimit {
    pub const DEFAULT: Self = Self(500);

    /// Zero falls back to the default.
    pub fn new(words: u32) -> Self {
        if words == 0 { Self::DEFAULT } else { Self(words) }
    }

    /// Accepts whatever the planner produced: `480`, `480.4`, `"450-600"`, `"about 480"`.
    pub fn from_value(value: Option<&Value>) -> Self {
        Self::from_value_or(value, Self::DEFAULT)
    }

    pub fn from_value_or(value: Option<&Value>, fallback: Self) -> Self {
        let Some(value) = value else {
            return fallback;
        };
        let words = coerce_int(value, i64::from(fallback.0));
        match u32::try_from(words) {
            Ok(words) if words > 0 => Self(words),
            _ => fallback,
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for WordLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for WordLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
