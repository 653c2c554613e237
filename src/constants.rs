//! Constants used throughout the application.
//!
//! This module contains all constants used in the fieldnotes application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "fieldnotes";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str =
    "A guided field journal with history, PDF export and AI reformatting";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable holding the record store location.
pub const ENV_VAR_DB: &str = "FIELDNOTES_DB";
/// Environment variable holding the optional SQLCipher key.
pub const ENV_VAR_DB_KEY: &str = "FIELDNOTES_DB_KEY";
/// Environment variable selecting the text generation backend.
pub const ENV_VAR_AI_PROVIDER: &str = "FIELDNOTES_AI_PROVIDER";
/// Environment variable overriding the text generation base URL.
pub const ENV_VAR_AI_URL: &str = "FIELDNOTES_AI_URL";
/// Environment variable holding the text generation credential.
pub const ENV_VAR_API_KEY: &str = "FIELDNOTES_API_KEY";
/// Conventional fallback credential variable.
pub const ENV_VAR_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable overriding the model identifier.
pub const ENV_VAR_MODEL: &str = "FIELDNOTES_MODEL";
/// Environment variable holding the civil UTC offset used for timestamps.
pub const ENV_VAR_UTC_OFFSET: &str = "FIELDNOTES_UTC_OFFSET";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default store location relative to the user's home directory.
pub const DEFAULT_DB_SUBPATH: &str = "Documents/fieldnotes/fieldnotes.db";
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Time
/// Default civil offset (America/Bogota, no daylight saving).
pub const DEFAULT_UTC_OFFSET: &str = "-05:00";
/// Timestamp format used in history headers and exports.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

// Text Generation
/// Default base URL for the OpenAI-compatible backend.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
/// Default base URL for a local Ollama server.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
/// Default model for the OpenAI-compatible backend.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
/// Default model for the Ollama backend.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:3b";
/// Maximum number of tokens requested per generation.
pub const DEFAULT_MAX_TOKENS: u32 = 1500;
/// Sampling temperature for reformatting (low, keeps wording close to the source).
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
/// HTTP timeout for generation requests, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

// Export
/// Deterministic default file name for PDF exports.
pub const DEFAULT_PDF_FILENAME: &str = "field_journal.pdf";
/// Title embedded in exported PDFs.
pub const PDF_DOCUMENT_TITLE: &str = "Field Journal";

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "fieldnotes";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
