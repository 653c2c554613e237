//! Configuration management for the fieldnotes application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults.
//!
//! # Environment Variables
//!
//! - `FIELDNOTES_DB`: Path to the record store (defaults to ~/Documents/fieldnotes/fieldnotes.db)
//! - `FIELDNOTES_DB_KEY`: Optional SQLCipher key for the record store
//! - `FIELDNOTES_AI_PROVIDER`: `openai` (default) or `ollama`
//! - `FIELDNOTES_AI_URL`: Base URL of the text generation service
//! - `FIELDNOTES_API_KEY`: API credential, falling back to `OPENAI_API_KEY`
//! - `FIELDNOTES_MODEL`: Model identifier
//! - `FIELDNOTES_UTC_OFFSET`: Civil offset for timestamps, `±HH:MM` (defaults to -05:00)

use crate::constants::{
    DEFAULT_DB_SUBPATH, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL,
    DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_URL, DEFAULT_UTC_OFFSET, ENV_VAR_AI_PROVIDER,
    ENV_VAR_AI_URL, ENV_VAR_API_KEY, ENV_VAR_DB, ENV_VAR_DB_KEY, ENV_VAR_HOME, ENV_VAR_MODEL,
    ENV_VAR_OPENAI_API_KEY, ENV_VAR_UTC_OFFSET, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use chrono::FixedOffset;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which text generation backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    OpenAi,
    Ollama,
}

impl AiProvider {
    fn default_url(self) -> &'static str {
        match self {
            AiProvider::OpenAi => DEFAULT_OPENAI_URL,
            AiProvider::Ollama => DEFAULT_OLLAMA_URL,
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            AiProvider::OpenAi => DEFAULT_OPENAI_MODEL,
            AiProvider::Ollama => DEFAULT_OLLAMA_MODEL,
        }
    }
}

impl FromStr for AiProvider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(AiProvider::OpenAi),
            "ollama" => Ok(AiProvider::Ollama),
            other => Err(AppError::Config(format!(
                "Unknown AI provider '{}'. Expected 'openai' or 'ollama'",
                other
            ))),
        }
    }
}

/// Parses a civil offset written as `±HH:MM` (or `Z`).
pub fn parse_utc_offset(raw: &str) -> AppResult<FixedOffset> {
    let raw = raw.trim();
    let invalid = || AppError::Config(format!("Invalid UTC offset '{}'. Expected ±HH:MM", raw));

    if raw.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match raw.chars().next() {
        Some('+') => (1, &raw[1..]),
        Some('-') => (-1, &raw[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Configuration for the fieldnotes application.
///
/// # Examples
///
/// Loading configuration from environment variables:
/// ```no_run
/// use fieldnotes::Config;
///
/// let config = Config::load().expect("Failed to load configuration");
/// config.validate().expect("Invalid configuration");
/// ```
#[derive(Clone)]
pub struct Config {
    /// Location of the record store.
    pub db_path: PathBuf,
    /// Optional SQLCipher key.
    pub db_key: Option<String>,
    pub ai_provider: AiProvider,
    /// Base URL of the text generation service.
    pub ai_url: String,
    /// API credential for the text generation service.
    pub api_key: Option<String>,
    /// Model identifier sent with every generation request.
    pub model: String,
    /// Civil offset used to stamp new entries and display timestamps.
    pub utc_offset: FixedOffset,
    pub http_timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |present: bool| if present { REDACTED_PLACEHOLDER } else { "None" };
        f.debug_struct("Config")
            .field("db_path", &REDACTED_PLACEHOLDER)
            .field("db_key", &redact(self.db_key.is_some()))
            .field("ai_provider", &self.ai_provider)
            .field("ai_url", &self.ai_url)
            .field("api_key", &redact(self.api_key.is_some()))
            .field("model", &self.model)
            .field("utc_offset", &self.utc_offset)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// Paths are expanded with `shellexpand`, so `~` and `$VAR` references work.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The database path expansion fails
    /// - The AI provider is not recognised
    /// - The UTC offset does not parse
    pub fn load() -> AppResult<Self> {
        let db_path_str = non_empty_var(ENV_VAR_DB).unwrap_or_else(|| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_default();
            format!("{}/{}", home, DEFAULT_DB_SUBPATH)
        });

        let expanded_path = shellexpand::full(&db_path_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        let db_path = PathBuf::from(expanded_path.into_owned());

        let ai_provider = match non_empty_var(ENV_VAR_AI_PROVIDER) {
            Some(raw) => raw.parse()?,
            None => AiProvider::OpenAi,
        };

        let ai_url = non_empty_var(ENV_VAR_AI_URL)
            .unwrap_or_else(|| ai_provider.default_url().to_string());
        let model = non_empty_var(ENV_VAR_MODEL)
            .unwrap_or_else(|| ai_provider.default_model().to_string());
        let api_key =
            non_empty_var(ENV_VAR_API_KEY).or_else(|| non_empty_var(ENV_VAR_OPENAI_API_KEY));

        let utc_offset = parse_utc_offset(
            &non_empty_var(ENV_VAR_UTC_OFFSET).unwrap_or_else(|| DEFAULT_UTC_OFFSET.to_string()),
        )?;

        Ok(Config {
            db_path,
            db_key: non_empty_var(ENV_VAR_DB_KEY),
            ai_provider,
            ai_url,
            api_key,
            model,
            utc_offset,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        })
    }

    /// Validates that the configuration is usable.
    ///
    /// A missing API key is not a configuration error: generation calls
    /// report it inline when they are made.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` with one of the following messages:
    /// - "Database path is empty"
    /// - "Database path must be absolute"
    /// - "Model identifier is empty"
    pub fn validate(&self) -> AppResult<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(AppError::Config("Database path is empty".to_string()));
        }

        if !self.db_path.is_absolute() {
            return Err(AppError::Config(
                "Database path must be absolute".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(AppError::Config("Model identifier is empty".to_string()));
        }

        Ok(())
    }
}
