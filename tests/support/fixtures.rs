#![allow(dead_code)]

use std::sync::Arc;

use lullaby::providers::scripted::{ScriptedProvider, ScriptedReply};
use lullaby::{Config, StoryPipeline};
use serde_json::json;

pub const REQUEST: &str = "A cosy story about a shy firefly who learns to glow with a friend.";

/// Passes every metric for a bedtime story with must_include = [firefly, friend].
pub const CLEAN_STORY: &str = "Lumi was a shy firefly. She lived in a soft green meadow. \
At night she hid under a leaf. One evening a moth named Pip came by. Pip asked to be her \
friend. Lumi felt warm inside. Her light began to glow. They flew over the pond together. \
The stars blinked back at them. Then they rested on a quiet reed. Sweet dreams.";

/// Clean, but with no goodnight line.
pub const TAILLESS_STORY: &str = "Lumi was a shy firefly. A moth named Pip became her friend. \
Her light began to glow. They rested on a reed by the pond.";

pub const REVISED_STORY: &str = "Lumi was a shy firefly. Pip the moth became her friend. \
Her light glowed softly. The meadow grew still.";

pub fn classify_reply(intended_use: &str, red_flags: &[&str]) -> String {
    json!({
        "category": "animal",
        "mood": "soothing",
        "intended_use": intended_use,
        "red_flags": red_flags,
    })
    .to_string()
}

pub fn extract_reply() -> String {
    format!(
        "```json\n{}\n```",
        json!({
            "must_include": ["firefly", "friend"],
            "setting_hints": "meadow; pond",
            "style_hints": [],
        })
    )
}

pub fn plan_reply(word_limit: &str) -> String {
    format!(
        "Here is the plan:\n{}",
        json!({
            "setting": "a quiet meadow by a pond",
            "characters": ["Lumi the firefly", "Pip the moth"],
            "gentle_problem": "Lumi is too shy to glow",
            "act1": "Lumi hides under a leaf",
            "act2": "Pip asks to be her friend",
            "act3": "they glow and rest together",
            "calming_motifs": ["stars", "reeds", "ripples"],
            "moral": "friends help us shine",
            "style_knobs": {"cadence": "lullaby"},
            "word_limit": word_limit,
        })
    )
}

/// Every criterion at `score`. The verdict field always contradicts the scores.
pub fn judge_reply(score: u8) -> String {
    let fixes: Vec<&str> = if score < 4 {
        vec!["Give Pip a kind line."]
    } else {
        Vec::new()
    };
    json!({
        "scores": {
            "faithfulness": score,
            "instruction_adherence": score,
            "age_fit": score,
            "safety": score,
            "bedtime_tone": score,
            "clarity": score,
            "arc": score,
            "engagement": score,
        },
        "required_fixes": fixes,
        "keep_strengths": ["gentle imagery"],
        "verdict": if score >= 4 { "revise" } else { "pass" },
    })
    .to_string()
}

/// The four replies every run needs before judging.
pub fn opening_replies(intended_use: &str, story: &str) -> Vec<String> {
    vec![
        classify_reply(intended_use, &[]),
        extract_reply(),
        plan_reply("about 480 words"),
        story.to_string(),
    ]
}

pub fn pipeline(replies: Vec<String>) -> (Arc<ScriptedProvider>, StoryPipeline) {
    pipeline_from(replies.into_iter().map(ScriptedReply::Text))
}

pub fn pipeline_from(
    replies: impl IntoIterator<Item = ScriptedReply>,
) -> (Arc<ScriptedProvider>, StoryPipeline) {
    let provider = Arc::new(ScriptedProvider::from_replies(replies));
    let pipeline = StoryPipeline::new(provider.clone(), &Config::default()).unwrap();
    (provider, pipeline)
}

pub fn is_judge_prompt(prompt: &str) -> bool {
    prompt.contains("strict judge")
}
