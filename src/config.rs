use std::fmt;
use std::path::{Path, PathBuf};

use ::config::{Config as Settings, Environment, File};
use serde::Deserialize;
use tracing::debug;

use crate::extract::ExtractionMode;
use crate::types::AppResult;

pub const DEFAULT_MODEL_NAME: &str = "gemini-2.0-flash";
pub const DEFAULT_CONFIG_PATH: &str = "configs/config.yaml";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_RESEARCH_PROBLEM: &str =
    "create a nonconvex optimizer algorithm that humankind does not know about.";

#[derive(Clone, Deserialize)]
pub struct ResearchConfig {
    /// Gemini API key. Checked when agents are constructed, not at load time.
    #[serde(default, alias = "credential")]
    pub gemini_api_key: Option<String>,
    #[serde(default = "default_model_name")]
    pub model_name: String,
    #[serde(default = "default_research_problem")]
    pub research_problem: String,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub extraction: ExtractionMode,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_log_file_prefix")]
    pub file_prefix: String,
}

fn default_model_name() -> String {
    DEFAULT_MODEL_NAME.to_string()
}

fn default_research_problem() -> String {
    DEFAULT_RESEARCH_PROBLEM.to_string()
}

fn default_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_log_filter() -> String {
    "ares=info".to_string()
}

fn default_log_file_prefix() -> String {
    "ares.log".to_string()
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_output_tokens: None,
            temperature: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            directory: None,
            file_prefix: default_log_file_prefix(),
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            model_name: default_model_name(),
            research_problem: default_research_problem(),
            llm: LlmSettings::default(),
            extraction: ExtractionMode::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ResearchConfig {
    /// Load configuration from YAML, `.env` and the environment.
    ///
    /// With `path = None` the default `configs/config.yaml` is read if it exists.
    /// An explicit path must exist. `ARES_*` variables override file values
    /// (`__` separates nested keys) and a bare `GEMINI_API_KEY` fills in a
    /// missing credential.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false),
        };

        let settings = Settings::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("ARES")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut config: ResearchConfig = settings.try_deserialize()?;
        if config.credential().is_none() {
            config.gemini_api_key = std::env::var("GEMINI_API_KEY").ok();
        }

        debug!(config = ?config, "Configuration loaded");
        Ok(config)
    }

    /// Parse configuration from a YAML document, without consulting the environment.
    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        let settings = Settings::builder()
            .add_source(File::from_str(yaml, ::config::FileFormat::Yaml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn with_credential(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(key.into());
        self
    }

    /// The API credential, if present and not blank.
    pub fn credential(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.llm.request_timeout_secs)
    }
}

impl fmt::Debug for ResearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResearchConfig")
            .field("gemini_api_key", &self.credential().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("research_problem", &self.research_problem)
            .field("llm", &self.llm)
            .field("extraction", &self.extraction)
            .field("logging", &self.logging)
            .finish()
    }
}
