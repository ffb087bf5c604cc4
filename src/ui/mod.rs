pub mod report;
pub mod style;
pub mod wrap;

pub use report::{render_metrics, render_scores};
pub use wrap::wrap_text;
