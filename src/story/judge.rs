//! Rubric scoring. The model supplies subjective scores; the objective
//! metrics then cap them, and the verdict is recomputed from the capped
//! scores. The model's own verdict field is never read.

use super::context::StoryContext;
use super::extract::extract_object;
use super::metrics::{Metrics, compute_metrics};
use super::normalize::{coerce_score, force_list};
use super::types::{Brief, Criterion, Draft, JudgeReport, Scores, Verdict};
use crate::config::CallKind;
use crate::error::Result;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Highest score a criterion keeps once a metric shows it was violated.
const VIOLATION_CEILING: u8 = 3;
const MAX_COLEMAN_LIAU: f64 = 4.0;
const MAX_AVG_SENTENCE_LEN: f64 = 15.0;

/// What the scorer said, before calibration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assessment {
    pub scores: BTreeMap<Criterion, u8>,
    pub required_fixes: Vec<String>,
    pub keep_strengths: Vec<String>,
}

impl Assessment {
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let scores = match object.get("scores") {
            Some(Value::Object(raw)) => Criterion::ALL
                .iter()
                .filter_map(|&criterion| {
                    let score = coerce_score(raw.get(&criterion.to_string())?)?;
                    Some((criterion, score))
                })
                .collect(),
            _ => BTreeMap::new(),
        };
        Self {
            scores,
            required_fixes: force_list(object.get("required_fixes")),
            keep_strengths: force_list(object.get("keep_strengths")),
        }
    }
}

/// Score the current draft. Metrics are recomputed from the draft on every call.
#[tracing::instrument(name = "judge", skip_all, fields(revision = draft.revision()))]
pub async fn judge(ctx: &StoryContext, draft: &Draft, brief: &Brief) -> Result<JudgeReport> {
    let metrics = compute_metrics(
        draft.text(),
        &brief.constraints.must_include,
        brief.classification.intended_use,
        brief.plan.word_limit,
    );
    let prompt = ctx.prompts.judge(draft.text(), brief, &metrics)?;
    let raw = ctx.ask(CallKind::Judge, &prompt).await?;
    let assessment = Assessment::from_object(&extract_object("judge", &raw)?);
    let report = calibrate(assessment, metrics);
    tracing::info!(verdict = %report.verdict, fixes = report.required_fixes.len(), "Draft judged");
    Ok(report)
}

/// Fill defaults, cap scores the metrics contradict, append one fix per
/// violation, and derive the verdict.
pub fn calibrate(assessment: Assessment, metrics: Metrics) -> JudgeReport {
    let mut scores = Scores::with_defaults(&assessment.scores);
    let mut required_fixes = assessment.required_fixes;

    let mut violation = |criterion: Criterion, fix: String| {
        tracing::debug!(%criterion, fix = %fix, "Score capped by metrics");
        scores.clip(criterion, VIOLATION_CEILING);
        required_fixes.push(fix);
    };

    if !metrics.missing_must_include.is_empty() {
        violation(
            Criterion::Faithfulness,
            format!(
                "Explicitly include: {}.",
                metrics.missing_must_include.join(", ")
            ),
        );
    }
    if metrics.over_word_limit {
        violation(
            Criterion::InstructionAdherence,
            format!("Trim to the {}-word limit.", metrics.word_limit),
        );
    }
    if metrics.dialogue_over_2 {
        violation(
            Criterion::InstructionAdherence,
            "Keep dialogue to at most 2 short lines.".to_string(),
        );
    }
    if metrics.coleman_liau_index > MAX_COLEMAN_LIAU
        || metrics.avg_sentence_len > MAX_AVG_SENTENCE_LEN
    {
        violation(
            Criterion::AgeFit,
            "Shorten sentences and simplify words.".to_string(),
        );
    }
    if metrics.intended_use.is_bedtime() && !metrics.bedtime_tail_ok {
        violation(
            Criterion::BedtimeTone,
            "End with a cozy goodnight image or line.".to_string(),
        );
    }

    JudgeReport {
        verdict: Verdict::from_scores(&scores),
        scores,
        required_fixes,
        keep_strengths: assessment.keep_strengths,
        metrics,
    }
}
