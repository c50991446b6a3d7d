use thiserror::Error;

/// Longest excerpt of raw model text carried by [`MalformedModelOutput`].
pub const EXCERPT_LIMIT: usize = 120;

/// Failure of a single call to the text-generation backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("LLM gateway is not configured: {0}")]
    Configuration(String),

    #[error("LLM request failed: {0}")]
    Upstream(String),

    #[error("LLM request timed out after {0} seconds")]
    Timeout(u64),
}

/// Model text that does not contain a parseable JSON object.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("LLM did not return JSON: {excerpt}...")]
pub struct MalformedModelOutput {
    pub excerpt: String,
}

impl MalformedModelOutput {
    pub fn from_raw(raw: &str) -> Self {
        Self {
            excerpt: raw.chars().take(EXCERPT_LIMIT).collect(),
        }
    }
}

/// Why one LLM stage produced nothing usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Malformed(#[from] MalformedModelOutput),
}

/// Turn-level failure surfaced to callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriageError {
    #[error("analysis stage failed: {0}")]
    Analysis(StageError),

    #[error("translation failed: {0}")]
    Translation(StageError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}
