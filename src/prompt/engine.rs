use crate::error::PromptError;
use tera::{Context, Tera};

/// Tera-backed template engine for building structured prompts.
pub struct TeraEngine {
    tera: Tera,
}

impl TeraEngine {
    /// Create with inline templates (no filesystem).
    pub fn new() -> Self {
        Self {
            tera: Tera::default(),
        }
    }

    /// Register a template from a string, replacing any previous one of that name.
    pub fn add_template(&mut self, name: &'static str, content: &str) -> Result<(), PromptError> {
        self.tera
            .add_raw_template(name, content)
            .map_err(|e| render_error(name, &e))
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &'static str, context: &Context) -> Result<String, PromptError> {
        self.tera
            .render(name, context)
            .map_err(|e| render_error(name, &e))
    }
}

fn render_error(template: &'static str, err: &tera::Error) -> PromptError {
    // Tera nests the useful detail (e.g. the missing variable) in `source`.
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    PromptError::Render { template, message }
}
