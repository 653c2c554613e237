//! Error types for fieldnotes.
//!
//! `AppError` is the single error returned across module boundaries, with one
//! nested enum per subsystem; `AppResult` is the matching result alias.
//!
//! Errors fall into three groups that are handled differently by callers:
//!
//! - record store failures (`DatabaseError`) propagate to `main` unchanged
//! - malformed stored photos never surface as errors; the history renderer
//!   swallows them and prints a generic line instead
//! - text generation failures (`AIError`) are converted into inline text by
//!   the reformat and merge operations

use std::io;
use thiserror::Error;

/// Represents specific error cases that can occur during record store operations.
///
/// # Examples
///
/// ```
/// use fieldnotes::errors::DatabaseError;
///
/// let error = DatabaseError::NotFound("Entry 123".to_string());
/// assert!(format!("{}", error).contains("not found"));
/// ```
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLite database error.
    #[error("Database error: {0}\n\nIf you're seeing 'file is not a database' or cipher errors, this may indicate:\n- Wrong FIELDNOTES_DB_KEY (the database is encrypted with SQLCipher)\n- Corrupted database file\n- Incompatible database format")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("Failed to get connection from pool: {0}\n\nThis may indicate the database file is unreachable or locked.")]
    Pool(#[from] r2d2::Error),

    /// Requested entry not found in the store.
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// A stored row could not be turned back into an entry.
    #[error("Corrupt record {id}: {message}")]
    CorruptRecord {
        /// Identifier of the offending row
        id: String,
        /// What was wrong with it
        message: String,
    },
}

/// Represents specific error cases that can occur when calling a text generator.
///
/// # Examples
///
/// ```
/// use fieldnotes::errors::AIError;
///
/// let error = AIError::ModelNotFound("gpt-4o-mini".to_string());
/// assert!(format!("{}", error).contains("gpt-4o-mini"));
/// ```
#[derive(Debug, Error)]
pub enum AIError {
    /// The generation endpoint could not be reached (DNS, refused, timeout).
    #[error("Text generation service unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The credential was missing or rejected.
    #[error("Text generation request was not authorized: {0}. Check FIELDNOTES_API_KEY")]
    Unauthorized(String),

    /// The service refused the request because of rate limits or quota.
    #[error("Text generation rate limit reached: {0}")]
    RateLimited(String),

    /// Requested model not known to the service.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Invalid or unexpected response from the service.
    #[error("Invalid response from text generation service: {0}")]
    InvalidResponse(String),
}

/// Errors raised while producing an export artifact.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The PDF backend rejected the document.
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// Writing the artifact to disk failed.
    #[error("Failed to write export to {path}: {source}")]
    Write {
        /// Destination path
        path: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Represents all possible errors that can occur in the fieldnotes application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use fieldnotes::errors::AppError;
///
/// let error = AppError::Config("Missing database path".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing database path");
/// ```
///
/// Converting from an IO error:
/// ```
/// use fieldnotes::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A submission was refused before anything was stored.
    #[error("Invalid entry: {0}")]
    Validation(String),

    /// Errors related to record store operations.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Errors related to text generation.
    #[error("AI error: {0}")]
    AI(#[from] AIError),

    /// Errors related to export artifacts.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use fieldnotes::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Validation("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
