pub mod http_client;
pub mod openai;
#[doc(hidden)]
pub mod scripted;
pub mod scrub;
pub mod timeout;
pub mod traits;

pub use openai::OpenAiProvider;
pub use scrub::{api_error, sanitize_api_error, scrub_secret_patterns};
pub use timeout::TimeoutProvider;
pub use traits::{CompletionRequest, Provider};

use crate::config::Config;
use std::sync::Arc;
use std::time::Duration;

/// Build the configured provider: OpenAI-compatible chat completions behind a
/// per-call deadline.
pub fn create_provider(config: &Config) -> Arc<dyn Provider> {
    let secs = config.request_timeout_secs;
    // The HTTP client deadline sits past ours so the overrun surfaces as a timeout.
    let openai = OpenAiProvider::new(
        &config.base_url,
        config.api_key.as_deref(),
        secs.saturating_add(5),
    );
    Arc::new(TimeoutProvider::new(openai, Duration::from_secs(secs)))
}
