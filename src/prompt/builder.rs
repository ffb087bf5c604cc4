use super::engine::TeraEngine;
use crate::error::PromptError;
use crate::story::metrics::Metrics;
use crate::story::types::{Brief, Classification, Constraints, IntendedUse};
use serde::Serialize;
use tera::Context;

const CLASSIFY_TEMPLATE: &str = "\
You sort story requests for a children's story service (ages 5-10).
Request: {{ request }}

Reply with strict JSON containing:
- \"category\": one of [\"animal\", \"friendship\", \"fantasy-gentle\", \"adventure-soft\", \"science-cosy\", \"custom\"]
- \"mood\": one of [\"very-soothing\", \"soothing\", \"light-playful\"]
- \"intended_use\": one of [\"bedtime\", \"general\"] (use \"general\" when the request says it is not a bedtime story)
- \"red_flags\": array of unsafe topics in the request (violence, fear, weapons, harm, bullying, nightmares, mature themes)
Output only the JSON object.";

const EXTRACT_TEMPLATE: &str = "\
Pull the hard constraints out of a story request.
Request: {{ request }}

Reply with strict JSON containing:
- \"must_include\": array of short phrases that must appear in the story (e.g. \"king\", \"queen\", \"lost everything\")
- \"setting_hints\": array of short place hints (e.g. \"castle\", \"village\", \"forest\")
- \"style_hints\": array of short tone or style hints, if the request gives any (e.g. \"not bedtime\", \"funny\", \"soft adventure\")
Output only the JSON object.";

const PLAN_TEMPLATE: &str = "\
You plan stories for children aged 5-10.

Constraints:
- Intended use: {{ intended_use }}. A bedtime story must feel calm and sleepy.
- Tone: {{ mood }}. Reassuring and age-appropriate.
- Vocabulary: common words, short sentences, simple past or present tense.
- Length target: 350-600 words.
- Shape: three acts, soft stakes, a positive ending.
- Category hint: {{ category }}.
- Must include: {{ must_include }}.
- Setting hints: {{ setting_hints }}.
- Style hints: {{ style_hints }}.

Reply with strict JSON containing:
setting, characters (2-3), gentle_problem, act1, act2, act3, calming_motifs (3-5),
moral, style_knobs (object, e.g. cadence \"lullaby\" or \"story\", repetition \"light\", dialogue \"sprinkle\"),
word_limit";

const TELL_TEMPLATE: &str = "\
You write stories for children aged 5-10.

Write the complete story from these beats:
{{ beats }}

Rules:
- Every one of these must appear in the story, woven in naturally: {{ must_include }}.
- Intended use is {{ intended_use }}. Bedtime: keep excitement low and end on a cozy image. General: uplifting and age-safe, but not sleepy.
- Simple words. Short sentences (15 words or fewer).
- Nothing frightening or violent. No harm.
- Stay within {{ word_limit }} words.
- One or two short lines of dialogue in total. Friendly names only.
- A gentle moral, never a lecture.

Output only the story.";

const JUDGE_TEMPLATE: &str = "\
You are a strict judge of stories for children aged 5-10.

The OBJECTIVE METRICS below are ground truth. Use them when scoring and deduct
points wherever a metric shows a broken constraint.

Rubric (integers 0-5):
- faithfulness: contains every must_include item; follows the request
- instruction_adherence: respects the word limit, at most 2 dialogue lines, required structure
- age_fit: simple words, short sentences
- safety: nothing scary, violent or mature
- bedtime_tone: calm and sleepy for bedtime; kid-appropriate tone for general
- clarity: coherent and easy to follow
- arc: clear beginning, middle and end; soft conflict; positive close
- engagement: warm imagery, small delights, not over-exciting

Hard guidance:
- missing_must_include not empty -> faithfulness at most 3.
- over_word_limit or dialogue_over_2 -> instruction_adherence at most 3.
- coleman_liau_index above 4.0 or avg_sentence_len above 15 -> age_fit at most 3.
- Give a 5 only when you can point to a concrete phrase in the story for that criterion.

Reply with JSON:
{
  \"scores\": {
    \"faithfulness\": 0-5,
    \"instruction_adherence\": 0-5,
    \"age_fit\": 0-5,
    \"safety\": 0-5,
    \"bedtime_tone\": 0-5,
    \"clarity\": 0-5,
    \"arc\": 0-5,
    \"engagement\": 0-5
  },
  \"required_fixes\": [\"...\"],
  \"keep_strengths\": [\"...\"],
  \"verdict\": \"pass\" | \"revise\"
}

OBJECTIVE METRICS (must be respected):
{{ metrics }}

Context:
- intended_use: {{ intended_use }}
- must_include: {{ must_include }}

Story:
---
{{ story }}
---";

const REVISE_TEMPLATE: &str = "\
You carefully revise stories for children.
Apply ONLY these fixes:
{{ fixes }}

Keep these strengths:
{{ strengths }}

Rules:
- Ages 5-10, short sentences, simple words.
- Intended use: {{ intended_use }}.
- Include each of: {{ must_include }}.
- Nothing frightening.
- Keep roughly the same length and a positive ending.

Return ONLY the revised story text.

Original story:
---
{{ story }}
---";

const FEEDBACK_TEMPLATE: &str = "\
You carefully revise stories for children.
Apply the reader's feedback faithfully while keeping the story safe and age-appropriate.

Reader feedback:
{{ feedback }}

Also apply these judge fixes where they still matter:
{{ fixes }}

Keep these strengths:
{{ strengths }}

Rules:
- Ages 5-10, short sentences, simple words.
- Intended use: {{ intended_use }}.
- Include each of: {{ must_include }}.
- End well: cozy for bedtime, otherwise positive and gentle.

Return ONLY the revised story text.

Original story:
---
{{ story }}
---";

const CLASSIFY_NAME: &str = "classify";
const EXTRACT_NAME: &str = "extract";
const PLAN_NAME: &str = "plan";
const TELL_NAME: &str = "tell";
const JUDGE_NAME: &str = "judge";
const REVISE_NAME: &str = "revise";
const FEEDBACK_NAME: &str = "feedback";

/// All story prompts, compiled once per pipeline.
pub struct StoryPrompts {
    engine: TeraEngine,
}

impl StoryPrompts {
    pub fn new() -> Result<Self, PromptError> {
        let mut engine = TeraEngine::new();
        engine.add_template(CLASSIFY_NAME, CLASSIFY_TEMPLATE)?;
        engine.add_template(EXTRACT_NAME, EXTRACT_TEMPLATE)?;
        engine.add_template(PLAN_NAME, PLAN_TEMPLATE)?;
        engine.add_template(TELL_NAME, TELL_TEMPLATE)?;
        engine.add_template(JUDGE_NAME, JUDGE_TEMPLATE)?;
        engine.add_template(REVISE_NAME, REVISE_TEMPLATE)?;
        engine.add_template(FEEDBACK_NAME, FEEDBACK_TEMPLATE)?;
        Ok(Self { engine })
    }

    pub fn classify(&self, request: &str) -> Result<String, PromptError> {
        let mut ctx = Context::new();
        ctx.insert("request", request);
        self.engine.render(CLASSIFY_NAME, &ctx)
    }

    pub fn extract(&self, request: &str) -> Result<String, PromptError> {
        let mut ctx = Context::new();
        ctx.insert("request", request);
        self.engine.render(EXTRACT_NAME, &ctx)
    }

    pub fn plan(
        &self,
        classification: &Classification,
        constraints: &Constraints,
    ) -> Result<String, PromptError> {
        let mut ctx = Context::new();
        ctx.insert("category", &classification.category.to_string());
        ctx.insert("mood", &classification.planning_mood().to_string());
        ctx.insert("intended_use", &classification.intended_use.to_string());
        ctx.insert("must_include", &json_list(&constraints.must_include));
        ctx.insert("setting_hints", &json_list(&constraints.setting_hints));
        ctx.insert("style_hints", &json_list(&constraints.style_hints));
        self.engine.render(PLAN_NAME, &ctx)
    }

    pub fn tell(&self, brief: &Brief) -> Result<String, PromptError> {
        let mut ctx = Context::new();
        ctx.insert("beats", &pretty_json(&brief.plan));
        ctx.insert("intended_use", &brief.classification.intended_use.to_string());
        ctx.insert("must_include", &json_list(&brief.constraints.must_include));
        ctx.insert("word_limit", &brief.plan.word_limit.get());
        self.engine.render(TELL_NAME, &ctx)
    }

    pub fn judge(&self, story: &str, brief: &Brief, metrics: &Metrics) -> Result<String, PromptError> {
        let mut ctx = Context::new();
        ctx.insert("metrics", &pretty_json(metrics));
        ctx.insert("intended_use", &brief.classification.intended_use.to_string());
        ctx.insert("must_include", &json_list(&brief.constraints.must_include));
        ctx.insert("story", story);
        self.engine.render(JUDGE_NAME, &ctx)
    }

    pub fn revise(
        &self,
        story: &str,
        fixes: &[String],
        strengths: &[String],
        intended_use: IntendedUse,
        must_include: &[String],
    ) -> Result<String, PromptError> {
        let mut ctx = Context::new();
        ctx.insert("fixes", &json_list(fixes));
        ctx.insert("strengths", &json_list(strengths));
        ctx.insert("intended_use", &intended_use.to_string());
        ctx.insert("must_include", &json_list(must_include));
        ctx.insert("story", story);
        self.engine.render(REVISE_NAME, &ctx)
    }

    pub fn feedback(
        &self,
        story: &str,
        feedback: &str,
        fixes: &[String],
        strengths: &[String],
        intended_use: IntendedUse,
        must_include: &[String],
    ) -> Result<String, PromptError> {
        let mut ctx = Context::new();
        ctx.insert("feedback", feedback);
        ctx.insert("fixes", &json_list(fixes));
        ctx.insert("strengths", &json_list(strengths));
        ctx.insert("intended_use", &intended_use.to_string());
        ctx.insert("must_include", &json_list(must_include));
        ctx.insert("story", story);
        self.engine.render(FEEDBACK_NAME, &ctx)
    }
}

fn json_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".into())
}

fn pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".into())
}
