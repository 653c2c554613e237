//! Client for OpenAI-compatible chat completion endpoints.

use super::{http_client, status_error, GenerationRequest, Message, TextGenerator};
use crate::errors::{AIError, AppResult};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for `POST /v1/chat/completions`.
pub struct OpenAiClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl OpenAiClient {
    /// Creates a client.
    ///
    /// A missing key is not an error here; calls made without one fail with
    /// `AIError::Unauthorized` without touching the network.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> AppResult<Self> {
        Ok(OpenAiClient {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client: http_client(timeout_secs)?,
        })
    }
}

impl TextGenerator for OpenAiClient {
    fn generate(&self, request: &GenerationRequest) -> AppResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AIError::Unauthorized("no API key configured".to_string()))?;

        debug!("Sending completion request with model: {}", request.model);

        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = CompletionRequest {
            model: &request.model,
            messages: request.messages(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(AIError::Unreachable)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(status_error(status, &error_text, &request.model).into());
        }

        let completion: CompletionResponse = response.json().map_err(|e| {
            AIError::InvalidResponse(format!("Failed to parse completion response: {}", e))
        })?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AIError::InvalidResponse("response contained no choices".to_string()))?;

        debug!("Received completion ({} chars)", text.len());
        Ok(text)
    }
}
