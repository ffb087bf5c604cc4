use super::context::StoryContext;
use super::types::{Classification, Constraints, Draft, FinalStory, JudgeReport};
use crate::config::CallKind;
use crate::error::Result;

/// The only fix the forced safety rewrite applies.
pub const SOFTEN_FIX: &str = "Remove any frightening element. Soften imagery.";

/// Apply exactly `fixes` to the draft in one call, keeping `strengths`.
#[tracing::instrument(name = "revise", skip_all, fields(fixes = fixes.len()))]
pub async fn revise(
    ctx: &StoryContext,
    draft: Draft,
    fixes: &[String],
    strengths: &[String],
    constraints: &Constraints,
    classification: &Classification,
) -> Result<Draft> {
    let prompt = ctx.prompts.revise(
        draft.text(),
        fixes,
        strengths,
        classification.intended_use,
        &constraints.must_include,
    )?;
    let text = ctx.ask(CallKind::Revise, &prompt).await?;
    Ok(draft.revised(text))
}

/// Session-level revision: the reader's feedback plus the latest judge fixes.
#[tracing::instrument(name = "feedback", skip_all)]
pub async fn revise_with_feedback(
    ctx: &StoryContext,
    story: &FinalStory,
    feedback: &str,
    report: &JudgeReport,
    constraints: &Constraints,
    classification: &Classification,
) -> Result<Draft> {
    let prompt = ctx.prompts.feedback(
        story.text(),
        feedback.trim(),
        &report.required_fixes,
        &report.keep_strengths,
        classification.intended_use,
        &constraints.must_include,
    )?;
    let text = ctx.ask(CallKind::Feedback, &prompt).await?;
    Ok(story.to_draft().revised(text))
}

/// Forced rewrite of a draft that tripped the safety filter.
pub async fn soften(
    ctx: &StoryContext,
    text: &str,
    constraints: &Constraints,
    classification: &Classification,
) -> Result<String> {
    let prompt = ctx.prompts.revise(
        text,
        &[SOFTEN_FIX.to_string()],
        &[],
        classification.intended_use,
        &constraints.must_include,
    )?;
    ctx.ask(CallKind::Soften, &prompt).await
}
