//! Coarse lexical gate for content that has no place in a children's story.
//!
//! Whole-word, case-insensitive matching against a fixed denylist. This is not
//! a semantic classifier and makes no false-negative guarantee; a hit only
//! triggers one forced softening rewrite right after generation.

use regex::Regex;
use std::sync::LazyLock;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum HazardKind {
    Weapons,
    Violence,
    SelfHarm,
    Substances,
    FrighteningEntity,
}

const DENYLIST: [(HazardKind, &str); 12] = [
    (HazardKind::Weapons, r"\bgun\b"),
    (HazardKind::Weapons, r"\bweapon\b"),
    (HazardKind::Weapons, r"\bbomb\b"),
    (HazardKind::Violence, r"\bkill\b"),
    (HazardKind::Violence, r"\bblood\b"),
    (HazardKind::Violence, r"\bwar\b"),
    (HazardKind::SelfHarm, r"\bsuicide\b"),
    (HazardKind::SelfHarm, r"\bself[- ]?harm\b"),
    (HazardKind::Substances, r"\bdrug\b"),
    (HazardKind::Substances, r"\balcohol\b"),
    (HazardKind::FrighteningEntity, r"\bnightmares?\b"),
    (HazardKind::FrighteningEntity, r"\bghosts?\b"),
];

static PATTERNS: LazyLock<Vec<(HazardKind, Regex)>> = LazyLock::new(|| {
    DENYLIST
        .iter()
        .map(|(kind, pattern)| {
            let regex = Regex::new(&format!("(?i){pattern}")).expect("denylist pattern is valid");
            (*kind, regex)
        })
        .collect()
});

/// One denylisted term found in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyHit {
    pub kind: HazardKind,
    pub term: String,
}

/// Every denylist match, in denylist order.
pub fn scan(text: &str) -> Vec<SafetyHit> {
    PATTERNS
        .iter()
        .flat_map(|(kind, regex)| {
            regex.find_iter(text).map(|m| SafetyHit {
                kind: *kind,
                term: m.as_str().to_lowercase(),
            })
        })
        .collect()
}

pub fn is_unsafe(text: &str) -> bool {
    PATTERNS.iter().any(|(_, regex)| regex.is_match(text))
}
