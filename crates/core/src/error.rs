//! Error types for texentry operations.
//!
//! This module defines the main error type [`TexEntryError`]. Only fetch
//! failures and compile failures are fatal to a run; structural gaps in
//! the source page are recovered during extraction and never surface here.
//!
//! # Example
//!
//! ```rust
//! use texentry_core::{TexEntryError, Result};
//!
//! fn require_html(html: &str) -> Result<&str> {
//!     if html.is_empty() {
//!         return Err(TexEntryError::HtmlParseError("empty document".to_string()));
//!     }
//!     Ok(html)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fetching, extraction, rendering and compilation.
///
/// # Example
///
/// ```rust
/// use texentry_core::TexEntryError;
///
/// let err = TexEntryError::CompileFailed {
///     program: "pdflatex".to_string(),
///     code: Some(1),
///     output: "! Undefined control sequence.".to_string(),
/// };
/// assert!(err.to_string().contains("pdflatex"));
/// ```
#[derive(Error, Debug)]
pub enum TexEntryError {
    /// HTTP transport errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("HTTP request to {url} failed with status {status}")]
    HttpStatus { status: u16, url: String },

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read and write errors.
    #[error("Failed to write to file: {0}")]
    WriteError(#[from] std::io::Error),

    /// JSON serialization of the document data failed.
    #[error("Failed to serialize document: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// The document compiler program was not found.
    #[error("Document compiler not found: {0}")]
    CompilerNotFound(String),

    /// The document compiler exists but could not be started.
    #[error("Failed to start document compiler {program}: {source}")]
    CompilerLaunch { program: String, source: std::io::Error },

    /// The document compiler ran but exited unsuccessfully.
    ///
    /// `output` carries the tail of the compiler's log so the caller can
    /// show the first LaTeX error without opening the `.log` file.
    #[error("{program} exited with status {}: {output}", describe_status(.code))]
    CompileFailed { program: String, code: Option<i32>, output: String },
}

fn describe_status(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}

/// Result type alias for TexEntryError.
pub type Result<T> = std::result::Result<T, TexEntryError>;
