use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::prescription::NoMatchPolicy;

/// Application-level constants
pub const APP_NAME: &str = "RxScribe";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Longest transcript handed to the parser, in characters.
/// A few minutes of dictation stays well under this.
pub const DEFAULT_MAX_TRANSCRIPT_CHARS: usize = 5000;

pub const ENV_NO_MATCH_POLICY: &str = "RXSCRIBE_NO_MATCH_POLICY";
pub const ENV_MAX_TRANSCRIPT_CHARS: &str = "RXSCRIBE_MAX_TRANSCRIPT_CHARS";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "warn,rxscribe_lib=info,rxscribe=info"
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown no-match policy '{0}' (expected 'empty' or 'placeholder')")]
    InvalidPolicy(String),

    #[error("Invalid transcript limit '{0}' (expected a positive integer)")]
    InvalidTranscriptLimit(String),
}

/// Parser settings shared by the CLI and library callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    pub no_match_policy: NoMatchPolicy,
    pub max_transcript_chars: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            no_match_policy: NoMatchPolicy::default(),
            max_transcript_chars: DEFAULT_MAX_TRANSCRIPT_CHARS,
        }
    }
}

impl ParserConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset or blank keys keep their default;
    /// set but malformed keys are an error rather than silently ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_NO_MATCH_POLICY).filter(|v| !v.trim().is_empty()) {
            config.no_match_policy = raw.parse()?;
        }

        if let Some(raw) = lookup(ENV_MAX_TRANSCRIPT_CHARS).filter(|v| !v.trim().is_empty()) {
            config.max_transcript_chars = parse_transcript_limit(&raw)?;
        }

        Ok(config)
    }
}

pub fn parse_transcript_limit(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(ConfigError::InvalidTranscriptLimit(raw.trim().to_string())),
    }
}
