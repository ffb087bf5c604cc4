use super::metrics::Metrics;
use super::normalize::WordLimit;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use strum::{Display, EnumString};

// ── Classification ──────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Category {
    Animal,
    Friendship,
    FantasyGentle,
    AdventureSoft,
    ScienceCosy,
    #[default]
    Custom,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Mood {
    VerySoothing,
    #[default]
    Soothing,
    LightPlayful,
}

/// Target context of the story; governs tone and the closing convention.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum IntendedUse {
    #[default]
    Bedtime,
    General,
}

impl IntendedUse {
    pub fn is_bedtime(self) -> bool {
        self == Self::Bedtime
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: Category,
    pub mood: Mood,
    pub intended_use: IntendedUse,
    pub red_flags: BTreeSet<String>,
}

impl Classification {
    pub fn has_red_flags(&self) -> bool {
        !self.red_flags.is_empty()
    }

    /// Mood handed to the planner: flagged requests are always planned very soothing.
    pub fn planning_mood(&self) -> Mood {
        if self.has_red_flags() {
            Mood::VerySoothing
        } else {
            self.mood
        }
    }
}

// ── Constraints & plan ──────────────────────────────────────────

pub const SOFTEN_STYLE_HINT: &str = "soften any intense content";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Constraints {
    pub must_include: Vec<String>,
    pub setting_hints: Vec<String>,
    pub style_hints: Vec<String>,
}

/// Story beats produced by the planner. Serialized back to JSON for the teller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub setting: String,
    pub characters: Vec<String>,
    pub gentle_problem: String,
    pub act1: String,
    pub act2: String,
    pub act3: String,
    pub calming_motifs: Vec<String>,
    pub moral: String,
    pub style_knobs: BTreeMap<String, String>,
    pub word_limit: WordLimit,
}

/// Everything decided before the first word is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Brief {
    pub classification: Classification,
    pub constraints: Constraints,
    pub plan: Plan,
}

// ── Draft & final story ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    text: String,
    revision: u32,
}

impl Draft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
            revision: 0,
        }
    }

    /// Replaces the whole text and bumps the revision counter.
    #[must_use]
    pub fn revised(self, text: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
            revision: self.revision + 1,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalStory {
    text: String,
    revision: u32,
}

impl FinalStory {
    pub(crate) fn new(text: String, revision: u32) -> Self {
        Self { text, revision }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Re-enters the session loop as a draft so it can be judged or revised again.
    pub fn to_draft(&self) -> Draft {
        Draft {
            text: self.text.clone(),
            revision: self.revision,
        }
    }
}

impl fmt::Display for FinalStory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ── Rubric ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Criterion {
    Faithfulness,
    InstructionAdherence,
    AgeFit,
    Safety,
    BedtimeTone,
    Clarity,
    Arc,
    Engagement,
}

impl Criterion {
    pub const ALL: [Self; 8] = [
        Self::Faithfulness,
        Self::InstructionAdherence,
        Self::AgeFit,
        Self::Safety,
        Self::BedtimeTone,
        Self::Clarity,
        Self::Arc,
        Self::Engagement,
    ];

    /// Criteria that only need to reach the bar (>= 4) to pass.
    pub const AT_LEAST_FOUR: [Self; 6] = [
        Self::InstructionAdherence,
        Self::AgeFit,
        Self::BedtimeTone,
        Self::Clarity,
        Self::Arc,
        Self::Engagement,
    ];

    /// Score assumed when the scorer omits this criterion.
    pub fn default_score(self) -> u8 {
        match self {
            Self::Faithfulness | Self::InstructionAdherence | Self::AgeFit => 3,
            Self::Safety => 5,
            Self::BedtimeTone | Self::Clarity | Self::Arc | Self::Engagement => 4,
        }
    }
}

pub const MAX_SCORE: u8 = 5;

/// Calibrated rubric: every criterion present, every value in `0..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scores([u8; 8]);

impl Scores {
    /// Fills omitted criteria with their defaults and clamps everything to `0..=5`.
    pub fn with_defaults(partial: &BTreeMap<Criterion, u8>) -> Self {
        let mut values = [0; 8];
        for (slot, criterion) in values.iter_mut().zip(Criterion::ALL) {
            let value = partial
                .get(&criterion)
                .copied()
                .unwrap_or_else(|| criterion.default_score());
            *slot = value.min(MAX_SCORE);
        }
        Self(values)
    }

    pub fn get(&self, criterion: Criterion) -> u8 {
        self.0[criterion as usize]
    }

    /// Lowers `criterion` to at most `ceiling`; never raises it.
    pub fn clip(&mut self, criterion: Criterion, ceiling: u8) {
        let slot = &mut self.0[criterion as usize];
        *slot = (*slot).min(ceiling);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, u8)> + '_ {
        Criterion::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

impl Serialize for Scores {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(Criterion::ALL.len()))?;
        for (criterion, value) in self.iter() {
            map.serialize_entry(&criterion, &value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Verdict {
    Pass,
    Revise,
}

impl Verdict {
    /// The pass bar: safety is perfect and every other criterion is at least 4.
    pub fn from_scores(scores: &Scores) -> Self {
        let pass = scores.get(Criterion::Safety) == MAX_SCORE
            && scores.get(Criterion::Faithfulness) >= 4
            && Criterion::AT_LEAST_FOUR
                .iter()
                .all(|&criterion| scores.get(criterion) >= 4);
        if pass { Self::Pass } else { Self::Revise }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JudgeReport {
    pub scores: Scores,
    pub required_fixes: Vec<String>,
    pub keep_strengths: Vec<String>,
    pub verdict: Verdict,
    pub metrics: Metrics,
}
