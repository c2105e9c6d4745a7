//! Runtime configuration from the environment.

use std::path::PathBuf;

use crate::extract::{PatternError, PatternTable, Vocabulary};

/// Default GitLab instance.
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";
/// Default model for the AI analysis path.
pub const DEFAULT_AI_MODEL: &str = "claude-sonnet-4-20250514";

/// Errors loading configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file was not valid YAML (or JSON) for its expected shape.
    #[error("invalid YAML: {0}")]
    Yaml(#[source] serde_yaml::Error),

    /// A vocabulary loaded but one of its patterns did not compile.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Settings read from `GITLAB_URL`, `GITLAB_TOKEN`, `ANTHROPIC_API_KEY`,
/// `GLT_AI_MODEL`, `GLT_VOCABULARY` and `GLT_RECORD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// GitLab base URL, without a trailing slash.
    pub gitlab_url: String,
    /// Private token for the live tracker.
    pub gitlab_token: Option<String>,
    /// Key for the live LLM adapter.
    pub anthropic_api_key: Option<String>,
    /// Model used by the AI analysis path.
    pub ai_model: String,
    /// YAML vocabulary replacing the built-in patterns.
    pub vocabulary_path: Option<PathBuf>,
    /// Cassette file to record port traffic into.
    pub record_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gitlab_url: DEFAULT_GITLAB_URL.to_string(),
            gitlab_token: None,
            anthropic_api_key: None,
            ai_model: DEFAULT_AI_MODEL.to_string(),
            vocabulary_path: None,
            record_path: None,
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Blank values
    /// count as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            gitlab_url: get("GITLAB_URL")
                .map_or(defaults.gitlab_url, |url| url.trim_end_matches('/').to_string()),
            gitlab_token: get("GITLAB_TOKEN"),
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            ai_model: get("GLT_AI_MODEL").unwrap_or(defaults.ai_model),
            vocabulary_path: get("GLT_VOCABULARY").map(PathBuf::from),
            record_path: get("GLT_RECORD").map(PathBuf::from),
        }
    }

    /// Compiles the configured vocabulary, or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns an error if the vocabulary file cannot be read, parsed or
    /// compiled.
    pub fn pattern_table(&self) -> Result<PatternTable, ConfigError> {
        match &self.vocabulary_path {
            Some(path) => Ok(Vocabulary::load(path)?.compile()?),
            None => Ok(PatternTable::builtin()),
        }
    }
}
