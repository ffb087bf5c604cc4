pub mod context;
pub mod extract;
pub mod finalize;
pub mod judge;
pub mod metrics;
pub mod normalize;
pub mod pipeline;
pub mod revise;
pub mod safety;
pub mod stages;
pub mod types;

pub use context::StoryContext;
pub use metrics::{Metrics, compute_metrics};
pub use pipeline::{Stage, StoryPipeline, StoryRun, route};
pub use types::{
    Brief, Category, Classification, Constraints, Criterion, Draft, FinalStory, IntendedUse,
    JudgeReport, Mood, Plan, Scores, Verdict,
};
