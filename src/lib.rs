#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod config;
pub mod error;
pub mod prompt;
pub mod providers;
pub mod story;
pub mod ui;

pub use config::Config;
pub use error::{Result, StoryError};
pub use story::{StoryPipeline, StoryRun};

/// Used when the reader just presses Enter.
pub const DEFAULT_REQUEST: &str =
    "A cosy story about a shy firefly who learns to glow with a friend.";
