pub mod schema;

pub use schema::{CallKind, Config, SamplingConfig, StageSampling, StoryConfig};
