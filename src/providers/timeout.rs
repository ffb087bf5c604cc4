use super::traits::{CompletionRequest, Provider};
use crate::error::LlmError;
use async_trait::async_trait;
use std::time::Duration;

/// Provider wrapper that bounds every completion with a wall-clock deadline.
///
/// A completion that overruns yields [`LlmError::Timeout`] wrapped in
/// `anyhow`, so stage code can downcast it back. There is no retry.
pub struct TimeoutProvider<P> {
    inner: P,
    limit: Duration,
}

impl<P: Provider> TimeoutProvider<P> {
    pub fn new(inner: P, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl<P: Provider> Provider for TimeoutProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn complete(&self, request: &CompletionRequest<'_>) -> anyhow::Result<String> {
        match tokio::time::timeout(self.limit, self.inner.complete(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    provider = self.inner.name(),
                    secs = self.limit.as_secs(),
                    "Completion timed out"
                );
                Err(LlmError::Timeout {
                    provider: self.inner.name().to_string(),
                    secs: self.limit.as_secs(),
                }
                .into())
            }
        }
    }

    async fn warmup(&self) -> anyhow::Result<()> {
        match tokio::time::timeout(self.limit, self.inner.warmup()).await {
            Ok(result) => result,
            Err(_) => anyhow::bail!("warmup timed out after {}s", self.limit.as_secs()),
        }
    }
}
