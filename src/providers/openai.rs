use super::http_client::build_provider_client_with_timeout;
use super::scrub::api_error;
use super::traits::{CompletionRequest, Provider};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat-completions client for OpenAI and any endpoint that speaks the same API.
pub struct OpenAiProvider {
    /// Pre-computed `"Bearer <key>"` header value (avoids `format!` per request).
    cached_auth_header: Option<String>,
    /// Pre-computed chat completions URL.
    cached_chat_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(base_url: &str, api_key: Option<&str>, timeout_secs: u64) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let cached_chat_url = if base_url.ends_with("chat/completions") {
            base_url.to_string()
        } else {
            format!("{base_url}/chat/completions")
        };
        Self {
            cached_auth_header: api_key
                .filter(|k| !k.trim().is_empty())
                .map(|k| format!("Bearer {}", k.trim())),
            cached_chat_url,
            client: build_provider_client_with_timeout(timeout_secs),
        }
    }

    fn chat_completions_url(&self) -> &str {
        &self.cached_chat_url
    }

    fn build_request<'a>(request: &CompletionRequest<'a>) -> ChatRequest<'a> {
        ChatRequest {
            model: request.model,
            messages: [Message {
                role: "user",
                content: request.prompt,
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }

    fn extract_text(chat_response: ChatResponse) -> anyhow::Result<String> {
        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No choices in OpenAI response"))?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &CompletionRequest<'_>) -> anyhow::Result<String> {
        let auth_header = self.cached_auth_header.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "OpenAI API key not set. Set LULLABY_API_KEY or OPENAI_API_KEY, or edit config.toml."
            )
        })?;

        let body = Self::build_request(request);
        tracing::debug!(
            model = request.model,
            temperature = request.temperature,
            max_tokens = request.max_tokens,
            prompt_chars = request.prompt.len(),
            "Sending chat completion"
        );

        let response = self
            .client
            .post(self.chat_completions_url())
            .header("Authorization", auth_header)
            .json(&body)
            .send()
            .await
            .context("OpenAI request failed")?;

        if !response.status().is_success() {
            return Err(api_error("OpenAI", response).await);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("OpenAI response JSON decode failed")?;
        Self::extract_text(chat_response)
    }

    async fn warmup(&self) -> anyhow::Result<()> {
        // Any response proves the TLS session is up; the status is irrelevant.
        if let Some(auth_header) = &self.cached_auth_header {
            let models_url = self
                .chat_completions_url()
                .trim_end_matches("/chat/completions")
                .to_string()
                + "/models";
            self.client
                .get(models_url)
                .header("Authorization", auth_header)
                .send()
                .await
                .context("OpenAI warmup request failed")?;
        }
        Ok(())
    }
}
