mod builder;
mod engine;

pub use builder::StoryPrompts;
pub use engine::TeraEngine;
