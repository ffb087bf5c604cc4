//! Structured extraction: one JSON object out of a free-text completion.
//!
//! Step one ([`extract_json`]) finds and parses the JSON; step two
//! ([`extract_object`]) insists on an object. Each stage then reads its own
//! typed shape from the map through the normalizers, so a drifting field
//! shape is never fatal while a missing object always is.

use crate::error::ParseError;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^```(?:json)?\s*|\s*```$").expect("fence pattern is valid")
});

const SNIPPET_CHARS: usize = 120;

/// Parse the JSON value a completion carries.
///
/// Strips a leading/trailing code fence, tries the span from the first `{` to
/// the last `}`, then falls back to the whole trimmed text.
pub fn extract_json(stage: &'static str, raw: &str) -> Result<Value, ParseError> {
    let trimmed = raw.trim();
    let unfenced = FENCE.replace_all(trimmed, "");
    let body = unfenced.trim();

    if let Some(span) = object_span(body)
        && let Ok(value) = serde_json::from_str(span)
    {
        return Ok(value);
    }

    serde_json::from_str(body).map_err(|_| ParseError::NoJson {
        stage,
        snippet: snippet(trimmed),
    })
}

/// Like [`extract_json`], but the value must be a JSON object.
pub fn extract_object(stage: &'static str, raw: &str) -> Result<Map<String, Value>, ParseError> {
    match extract_json(stage, raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(ParseError::NotAnObject { stage }),
    }
}

fn object_span(text: &str) -> Option<&str> {
    let open = text.find('{')?;
    let close = text.rfind('}')?;
    (close > open).then(|| &text[open..=close])
}

fn snippet(text: &str) -> String {
    if text.chars().count() <= SNIPPET_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(SNIPPET_CHARS).collect();
    format!("{cut}...")
}
