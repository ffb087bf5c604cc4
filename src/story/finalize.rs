use super::metrics::has_bedtime_tail;
use super::types::{Classification, Draft, FinalStory};

pub const GOODNIGHT_TAIL: &str = "\n\nSweet dreams.";

/// Trim and close with "Sweet dreams." unless a recognised goodnight line is already there.
pub fn with_goodnight(text: &str) -> String {
    let text = text.trim();
    if has_bedtime_tail(text) {
        text.to_string()
    } else {
        format!("{text}{GOODNIGHT_TAIL}")
    }
}

pub fn finalize(draft: &Draft, classification: &Classification) -> FinalStory {
    let text = if classification.intended_use.is_bedtime() {
        with_goodnight(draft.text())
    } else {
        draft.text().trim().to_string()
    };
    FinalStory::new(text, draft.revision())
}
