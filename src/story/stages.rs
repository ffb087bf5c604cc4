//! The four stages before judging. Each takes only what it needs and returns
//! what it produces; the typed readers are pure and tested on raw JSON.

use super::context::StoryContext;
use super::extract::extract_object;
use super::normalize::{WordLimit, coerce_text, force_list};
use super::revise::soften;
use super::safety;
use super::types::{
    Brief, Classification, Constraints, Draft, IntendedUse, Mood, Plan,
    SOFTEN_STYLE_HINT,
};
use crate::config::CallKind;
use crate::error::Result;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;

type Object = Map<String, Value>;

#[tracing::instrument(name = "classify", skip_all)]
pub async fn classify(ctx: &StoryContext, request: &str) -> Result<Classification> {
    let prompt = ctx.prompts.classify(request)?;
    let raw = ctx.ask(CallKind::Classify, &prompt).await?;
    let classification = read_classification(request, &extract_object("classify", &raw)?);
    tracing::debug!(
        category = %classification.category,
        mood = %classification.mood,
        intended_use = %classification.intended_use,
        red_flags = classification.red_flags.len(),
        "Request classified"
    );
    Ok(classification)
}

#[tracing::instrument(name = "extract", skip_all)]
pub async fn extract_constraints(
    ctx: &StoryContext,
    request: &str,
    classification: &Classification,
) -> Result<Constraints> {
    let prompt = ctx.prompts.extract(request)?;
    let raw = ctx.ask(CallKind::Extract, &prompt).await?;
    let constraints = read_constraints(&extract_object("extract", &raw)?, classification);
    tracing::debug!(
        must_include = ?constraints.must_include,
        "Constraints extracted"
    );
    Ok(constraints)
}

#[tracing::instrument(name = "plan", skip_all)]
pub async fn plan(
    ctx: &StoryContext,
    classification: &Classification,
    constraints: &Constraints,
) -> Result<Plan> {
    let prompt = ctx.prompts.plan(classification, constraints)?;
    let raw = ctx.ask(CallKind::Plan, &prompt).await?;
    let plan = read_plan(&extract_object("plan", &raw)?, ctx.default_word_limit);
    tracing::debug!(word_limit = %plan.word_limit, "Story planned");
    Ok(plan)
}

/// Write the first draft. A draft that trips the safety filter is rewritten
/// once, and the rewrite is accepted as is.
#[tracing::instrument(name = "generate", skip_all)]
pub async fn generate(ctx: &StoryContext, brief: &Brief) -> Result<Draft> {
    let prompt = ctx.prompts.tell(brief)?;
    let text = ctx.ask(CallKind::Tell, &prompt).await?;

    let hits = safety::scan(&text);
    if hits.is_empty() {
        return Ok(Draft::new(text));
    }
    for hit in &hits {
        tracing::warn!(kind = %hit.kind, term = %hit.term, "Draft tripped the safety filter");
    }
    let softened = soften(ctx, &text, &brief.constraints, &brief.classification).await?;
    Ok(Draft::new(softened))
}

// ── Typed readers ───────────────────────────────────────────────

pub fn read_classification(request: &str, object: &Object) -> Classification {
    let intended_use = parse_label::<IntendedUse>(object.get("intended_use"))
        .unwrap_or_else(|| fallback_intended_use(request));
    Classification {
        category: parse_label(object.get("category")).unwrap_or_default(),
        mood: parse_label::<Mood>(object.get("mood")).unwrap_or_default(),
        intended_use,
        red_flags: force_list(object.get("red_flags")).into_iter().collect(),
    }
}

pub fn read_constraints(object: &Object, classification: &Classification) -> Constraints {
    let mut style_hints = force_list(object.get("style_hints"));
    if classification.has_red_flags() && !style_hints.iter().any(|h| h == SOFTEN_STYLE_HINT) {
        style_hints.push(SOFTEN_STYLE_HINT.to_string());
    }
    Constraints {
        must_include: force_list(object.get("must_include")),
        setting_hints: force_list(object.get("setting_hints")),
        style_hints,
    }
}

pub fn read_plan(object: &Object, default_word_limit: WordLimit) -> Plan {
    let text = |key: &str| coerce_text(object.get(key));
    let style_knobs: BTreeMap<String, String> = match object.get("style_knobs") {
        Some(Value::Object(knobs)) => knobs
            .iter()
            .map(|(k, v)| (k.clone(), coerce_text(Some(v))))
            .filter(|(_, v)| !v.is_empty())
            .collect(),
        _ => BTreeMap::new(),
    };
    Plan {
        setting: text("setting"),
        characters: force_list(object.get("characters")),
        gentle_problem: text("gentle_problem"),
        act1: text("act1"),
        act2: text("act2"),
        act3: text("act3"),
        calming_motifs: force_list(object.get("calming_motifs")),
        moral: text("moral"),
        style_knobs,
        word_limit: WordLimit::from_value_or(object.get("word_limit"), default_word_limit),
    }
}

/// Labels arrive as `fantasy-gentle`, `Fantasy Gentle`, or `fantasy_gentle`.
fn parse_label<T: FromStr>(value: Option<&Value>) -> Option<T> {
    let label = value?.as_str()?.trim().replace(['_', ' '], "-");
    T::from_str(&label).ok()
}

fn fallback_intended_use(request: &str) -> IntendedUse {
    if request.to_lowercase().contains("not a bedtime") {
        IntendedUse::General
    } else {
        IntendedUse::Bedtime
    }
}
