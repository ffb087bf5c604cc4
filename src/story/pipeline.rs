//! Run orchestration.
//!
//! A run is a single [`RunState`] value moved from stage to stage. Only the
//! judge branches, and revision always goes straight to finalize, so a run
//! visits at most [`MAX_STAGE_VISITS`] stages and judges exactly once.

use super::context::StoryContext;
use super::finalize::finalize;
use super::judge::judge;
use super::revise::{revise, revise_with_feedback};
use super::stages::{classify, extract_constraints, generate, plan};
use super::types::{
    Brief, Classification, Constraints, Draft, FinalStory, JudgeReport, Verdict,
};
use crate::config::Config;
use crate::error::Result;
use crate::providers::Provider;
use std::sync::Arc;
use strum::Display;
use tracing::Instrument;
use uuid::Uuid;

pub const MAX_STAGE_VISITS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Classify,
    Extract,
    Plan,
    Generate,
    Judge,
    Revise,
    Finalize,
}

enum RunState {
    Classify,
    Extract(Classification),
    Plan(Classification, Constraints),
    Generate(Brief),
    Judge(Brief, Draft),
    Revise(Brief, Draft, JudgeReport),
    Finalize(Brief, Draft, JudgeReport),
    Done(Brief, FinalStory, JudgeReport),
}

impl RunState {
    fn stage(&self) -> Option<Stage> {
        match self {
            Self::Classify => Some(Stage::Classify),
            Self::Extract(..) => Some(Stage::Extract),
            Self::Plan(..) => Some(Stage::Plan),
            Self::Generate(..) => Some(Stage::Generate),
            Self::Judge(..) => Some(Stage::Judge),
            Self::Revise(..) => Some(Stage::Revise),
            Self::Finalize(..) => Some(Stage::Finalize),
            Self::Done(..) => None,
        }
    }
}

/// Where a judged draft goes next. Recomputes the verdict from the scores.
pub fn route(report: &JudgeReport) -> Stage {
    let verdict = Verdict::from_scores(&report.scores);
    if verdict != report.verdict {
        tracing::warn!(
            reported = %report.verdict,
            recomputed = %verdict,
            "Judge verdict disagrees with its scores; routing on the scores"
        );
    }
    match verdict {
        Verdict::Pass => Stage::Finalize,
        Verdict::Revise => Stage::Revise,
    }
}

/// Outcome of one automatic run.
#[derive(Debug, Clone)]
pub struct StoryRun {
    pub run_id: Uuid,
    pub brief: Brief,
    pub story: FinalStory,
    /// The single judge report produced during the run.
    pub report: JudgeReport,
    /// Stages in visit order.
    pub trace: Vec<Stage>,
}

pub struct StoryPipeline {
    ctx: StoryContext,
}

impl StoryPipeline {
    pub fn new(provider: Arc<dyn Provider>, config: &Config) -> Result<Self> {
        Ok(Self {
            ctx: StoryContext::new(provider, config)?,
        })
    }

    pub async fn run(&self, request: &str) -> Result<StoryRun> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("story_run", %run_id, provider = self.ctx.provider_name());
        self.drive(run_id, request.trim()).instrument(span).await
    }

    async fn drive(&self, run_id: Uuid, request: &str) -> Result<StoryRun> {
        let mut state = RunState::Classify;
        let mut trace = Vec::with_capacity(MAX_STAGE_VISITS);

        while let Some(stage) = state.stage() {
            if trace.len() == MAX_STAGE_VISITS {
                return Err(anyhow::anyhow!("run exceeded {MAX_STAGE_VISITS} stages").into());
            }
            trace.push(stage);
            tracing::debug!(%stage, "Entering stage");
            state = self.step(state, request).await?;
        }

        let RunState::Done(brief, story, report) = state else {
            return Err(anyhow::anyhow!("run stopped before finalizing").into());
        };
        tracing::info!(
            stages = trace.len(),
            revision = story.revision(),
            verdict = %report.verdict,
            "Run complete"
        );
        Ok(StoryRun {
            run_id,
            brief,
            story,
            report,
            trace,
        })
    }

    async fn step(&self, state: RunState, request: &str) -> Result<RunState> {
        let ctx = &self.ctx;
        Ok(match state {
            RunState::Classify => RunState::Extract(classify(ctx, request).await?),
            RunState::Extract(classification) => {
                let constraints = extract_constraints(ctx, request, &classification).await?;
                RunState::Plan(classification, constraints)
            }
            RunState::Plan(classification, constraints) => {
                let plan = plan(ctx, &classification, &constraints).await?;
                RunState::Generate(Brief {
                    classification,
                    constraints,
                    plan,
                })
            }
            RunState::Generate(brief) => {
                let draft = generate(ctx, &brief).await?;
                RunState::Judge(brief, draft)
            }
            RunState::Judge(brief, draft) => {
                let report = judge(ctx, &draft, &brief).await?;
                match route(&report) {
                    Stage::Revise => RunState::Revise(brief, draft, report),
                    _ => RunState::Finalize(brief, draft, report),
                }
            }
            RunState::Revise(brief, draft, report) => {
                let draft = revise(
                    ctx,
                    draft,
                    &report.required_fixes,
                    &report.keep_strengths,
                    &brief.constraints,
                    &brief.classification,
                )
                .await?;
                RunState::Finalize(brief, draft, report)
            }
            RunState::Finalize(brief, draft, report) => {
                let story = finalize(&draft, &brief.classification);
                RunState::Done(brief, story, report)
            }
            done @ RunState::Done(..) => done,
        })
    }

    // ── Session operations ──────────────────────────────────────

    /// Judge an already finalized story again, e.g. to show its scores.
    pub async fn rejudge(&self, story: &FinalStory, brief: &Brief) -> Result<JudgeReport> {
        judge(&self.ctx, &story.to_draft(), brief).await
    }

    /// One feedback revision, finalized. The caller decides whether to re-judge.
    pub async fn apply_feedback(
        &self,
        story: &FinalStory,
        feedback: &str,
        report: &JudgeReport,
        brief: &Brief,
    ) -> Result<FinalStory> {
        let draft = revise_with_feedback(
            &self.ctx,
            story,
            feedback,
            report,
            &brief.constraints,
            &brief.classification,
        )
        .await?;
        Ok(finalize(&draft, &brief.classification))
    }
}
