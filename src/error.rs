use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `lullaby`.
///
/// Every variant is fatal for the run that produced it: the pipeline never
/// returns a partial story. Provider internals keep using `anyhow::Result`
/// for context chains and are folded into [`LlmError`] at the stage boundary.
#[derive(Debug, Error)]
pub enum StoryError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── LLM / Provider ──────────────────────────────────────────────────
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    // ── Structured extraction ───────────────────────────────────────────
    #[error("parse: {0}")]
    Parse(#[from] ParseError),

    // ── Prompt / Template ───────────────────────────────────────────────
    #[error("prompt: {0}")]
    Prompt(#[from] PromptError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider {provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("provider {provider} did not answer within {secs}s")]
    Timeout { provider: String, secs: u64 },

    #[error("provider {provider} returned an empty completion")]
    EmptyCompletion { provider: String },
}

// ─── Structured extraction errors ───────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{stage}: no JSON object found in completion: {snippet}")]
    NoJson { stage: &'static str, snippet: String },

    #[error("{stage}: completion JSON is not an object")]
    NotAnObject { stage: &'static str },
}

// ─── Prompt / Template errors ───────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("template {template} failed to render: {message}")]
    Render {
        template: &'static str,
        message: String,
    },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, StoryError>;
