//! Text generation clients used to reformat and merge journal text.
//!
//! Two backends are supported behind the [`TextGenerator`] trait: an
//! OpenAI-compatible chat completions API and a local Ollama server. Both are
//! blocking; every call holds the caller until the service answers or the
//! client timeout fires. Nothing here retries.
//!
//! # Module Structure
//!
//! - `openai`: HTTP client for OpenAI-compatible chat completions
//! - `ollama`: HTTP client for the Ollama chat API
//! - `prompts`: Instruction templates and prompt builders
//!
//! # Example
//!
//! ```no_run
//! use fieldnotes::ai::{GenerationRequest, OllamaClient, TextGenerator};
//!
//! let client = OllamaClient::new("http://127.0.0.1:11434", 60)?;
//! let request = GenerationRequest::new("llama3.2:3b", "Fix the grammar.", "helo wrld");
//! let text = client.generate(&request)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod ollama;
pub mod openai;
pub mod prompts;

use crate::config::{AiProvider, Config};
use crate::constants::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::errors::{AIError, AppResult};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender (system, user, assistant)
    pub role: String,
    /// The content of the message
    pub content: String,
}

impl Message {
    /// Creates a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Everything a generation call sends.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Model identifier understood by the backend.
    pub model: String,
    /// System instruction framing the task.
    pub instruction: String,
    /// User prompt built from journal text.
    pub prompt: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerationRequest {
    /// Creates a request with the default length limit and temperature.
    pub fn new(
        model: impl Into<String>,
        instruction: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        GenerationRequest {
            model: model.into(),
            instruction: instruction.into(),
            prompt: prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// The instruction and prompt as chat messages.
    pub fn messages(&self) -> Vec<Message> {
        vec![
            Message::system(self.instruction.clone()),
            Message::user(self.prompt.clone()),
        ]
    }
}

/// A service that turns a prompt into free text.
pub trait TextGenerator {
    /// Submits the request and returns the generated text unchanged.
    ///
    /// # Errors
    ///
    /// Returns `AppError::AI` when the service is unreachable, rejects the
    /// request, or answers with something that is not a generation result.
    fn generate(&self, request: &GenerationRequest) -> AppResult<String>;
}

/// Builds the generator selected by configuration.
pub fn build_generator(config: &Config) -> AppResult<Box<dyn TextGenerator>> {
    let generator: Box<dyn TextGenerator> = match config.ai_provider {
        AiProvider::OpenAi => Box::new(OpenAiClient::new(
            config.ai_url.clone(),
            config.api_key.clone(),
            config.http_timeout_secs,
        )?),
        AiProvider::Ollama => Box::new(OllamaClient::new(
            config.ai_url.clone(),
            config.http_timeout_secs,
        )?),
    };
    Ok(generator)
}

/// Maps a non-success HTTP status to the matching error.
pub(crate) fn status_error(status: StatusCode, body: &str, model: &str) -> AIError {
    let detail = format!("HTTP {}: {}", status, body.trim());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AIError::Unauthorized(detail),
        StatusCode::TOO_MANY_REQUESTS => AIError::RateLimited(detail),
        StatusCode::NOT_FOUND => AIError::ModelNotFound(model.to_string()),
        _ => AIError::InvalidResponse(detail),
    }
}

/// Shared blocking HTTP client with the configured timeout.
pub(crate) fn http_client(timeout_secs: u64) -> AppResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| crate::errors::AppError::Config(format!("Failed to build HTTP client: {}", e)))
}
