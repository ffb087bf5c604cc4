use super::normalize::WordLimit;
use crate::config::{CallKind, Config, SamplingConfig};
use crate::error::{LlmError, Result};
use crate::prompt::StoryPrompts;
use crate::providers::{CompletionRequest, Provider};
use std::sync::Arc;

/// Everything a stage needs besides its own inputs: the completion service,
/// sampling per call, and the compiled prompts.
pub struct StoryContext {
    provider: Arc<dyn Provider>,
    model: String,
    sampling: SamplingConfig,
    pub(crate) prompts: StoryPrompts,
    pub(crate) default_word_limit: WordLimit,
}

impl StoryContext {
    pub fn new(provider: Arc<dyn Provider>, config: &Config) -> Result<Self> {
        Ok(Self {
            provider,
            model: config.model.clone(),
            sampling: config.sampling.clone(),
            prompts: StoryPrompts::new()?,
            default_word_limit: WordLimit::new(config.story.default_word_limit),
        })
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// One completion for `call`. Blank completions are errors.
    pub(crate) async fn ask(&self, call: CallKind, prompt: &str) -> Result<String> {
        let sampling = self.sampling.get(call);
        let request = CompletionRequest {
            prompt,
            model: &self.model,
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
        };
        tracing::debug!(call = %call, "Requesting completion");

        let text = self
            .provider
            .complete(&request)
            .await
            .map_err(|e| self.llm_error(e))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyCompletion {
                provider: self.provider.name().to_string(),
            }
            .into());
        }
        tracing::debug!(call = %call, chars = text.len(), "Completion received");
        Ok(text.to_string())
    }

    fn llm_error(&self, err: anyhow::Error) -> LlmError {
        match err.downcast::<LlmError>() {
            Ok(llm) => llm,
            Err(other) => LlmError::Request {
                provider: self.provider.name().to_string(),
                message: format!("{other:#}"),
            },
        }
    }
}
