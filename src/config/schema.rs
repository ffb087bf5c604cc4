use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use strum::Display;

pub const DEFAULT_BASE_URL: &str = crate::providers::openai::DEFAULT_BASE_URL;
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const CONFIG_DIR: &str = ".lullaby";
const CONFIG_FILE: &str = "config.toml";

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where this config was read from - computed, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
    pub story: StoryConfig,
    pub sampling: SamplingConfig,
}

// ── Story ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    /// Used when the planner gives no usable word limit
    pub default_word_limit: u32,
    /// Console wrap width for printed stories
    pub wrap_width: usize,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            default_word_limit: 500,
            wrap_width: 92,
        }
    }
}

// ── Sampling ──────────────────────────────────────────────────────

/// Every distinct completion the pipeline makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CallKind {
    Classify,
    Extract,
    Plan,
    Tell,
    Soften,
    Judge,
    Revise,
    Feedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageSampling {
    pub temperature: f64,
    pub max_tokens: u32,
}

impl StageSampling {
    const fn new(temperature: f64, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

/// Per-call sampling. A `[sampling.<call>]` table must set both fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub classify: StageSampling,
    pub extract: StageSampling,
    pub plan: StageSampling,
    pub tell: StageSampling,
    pub soften: StageSampling,
    pub judge: StageSampling,
    pub revise: StageSampling,
    pub feedback: StageSampling,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            classify: StageSampling::new(0.2, 300),
            extract: StageSampling::new(0.1, 300),
            plan: StageSampling::new(0.4, 700),
            tell: StageSampling::new(0.8, 1000),
            soften: StageSampling::new(0.5, 900),
            judge: StageSampling::new(0.0, 900),
            revise: StageSampling::new(0.5, 1000),
            feedback: StageSampling::new(0.5, 1000),
        }
    }
}

impl SamplingConfig {
    pub fn get(&self, call: CallKind) -> StageSampling {
        match call {
            CallKind::Classify => self.classify,
            CallKind::Extract => self.extract,
            CallKind::Plan => self.plan,
            CallKind::Tell => self.tell,
            CallKind::Soften => self.soften,
            CallKind::Judge => self.judge,
            CallKind::Revise => self.revise,
            CallKind::Feedback => self.feedback,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for call in [
            CallKind::Classify,
            CallKind::Extract,
            CallKind::Plan,
            CallKind::Tell,
            CallKind::Soften,
            CallKind::Judge,
            CallKind::Revise,
            CallKind::Feedback,
        ] {
            let sampling = self.get(call);
            if sampling.temperature.is_nan() || !(0.0..=2.0).contains(&sampling.temperature) {
                return Err(ConfigError::Validation(format!(
                    "sampling.{call}.temperature must be in [0.0, 2.0]"
                )));
            }
            if sampling.max_tokens == 0 {
                return Err(ConfigError::Validation(format!(
                    "sampling.{call}.max_tokens must be positive"
                )));
            }
        }
        Ok(())
    }
}

// ── Config impl ──────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        Self {
            config_path: home.join(CONFIG_DIR).join(CONFIG_FILE),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: 120,
            story: StoryConfig::default(),
            sampling: SamplingConfig::default(),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .ok_or_else(|| ConfigError::Load("could not find home directory".into()))?;
        Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load, apply environment overrides, and validate.
    ///
    /// An explicit path must exist; the default path falls back to built-in
    /// defaults when absent. Nothing is ever written.
    pub fn load(explicit: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(raw) => {
                let path = PathBuf::from(shellexpand::tilde(raw).as_ref());
                if !path.exists() {
                    return Err(ConfigError::Load(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::read_from(&path)?
            }
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::read_from(&path)?
                } else {
                    tracing::debug!(path = %path.display(), "No config file, using defaults");
                    Self {
                        config_path: path,
                        ..Self::default()
                    }
                }
            }
        };
        config.apply_env_overrides();
        config.validate().map_err(|e| match e {
            ConfigError::Validation(message) => ConfigError::Validation(format!(
                "{message} (config: {})",
                config.config_path.display()
            )),
            other => other,
        })?;
        tracing::debug!(
            path = %config.config_path.display(),
            model = %config.model,
            "Config loaded"
        );
        Ok(config)
    }

    pub fn read_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // API Key: LULLABY_API_KEY or OPENAI_API_KEY
        if let Some(key) = non_empty("LULLABY_API_KEY").or_else(|| non_empty("OPENAI_API_KEY")) {
            self.api_key = Some(key.trim().to_string());
        }

        if let Some(model) = non_empty("LULLABY_MODEL") {
            self.model = model.trim().to_string();
        }

        if let Some(url) = non_empty("LULLABY_BASE_URL") {
            self.base_url = url.trim().to_string();
        }

        if let Some(secs) = non_empty("LULLABY_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) => self.request_timeout_secs = secs,
                Err(_) => tracing::warn!(value = %secs, "Ignoring invalid LULLABY_TIMEOUT_SECS"),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::Validation("model must not be empty".into()));
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("base_url must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "request_timeout_secs must be positive".into(),
            ));
        }
        if self.story.default_word_limit == 0 {
            return Err(ConfigError::Validation(
                "story.default_word_limit must be positive".into(),
            ));
        }
        if self.story.wrap_width < 20 {
            return Err(ConfigError::Validation(
                "story.wrap_width must be at least 20".into(),
            ));
        }
        self.sampling.validate()
    }
}
