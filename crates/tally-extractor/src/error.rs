//! Error types for extraction

use thiserror::Error;

/// Errors that can occur while extracting one document
///
/// These never escape a batch: the orchestrator records them on the
/// document's result row and moves on.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Analysis backend failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// Extraction exceeded the configured timeout
    #[error("Extraction timed out")]
    Timeout,

    /// Document exceeds the per-document size limit
    #[error("Document too large: {0} bytes (max: {1})")]
    DocumentTooLarge(usize, usize),

    /// Staged document file could not be read
    #[error("Unreadable document: {0}")]
    Unreadable(String),

    /// No well-formed JSON object found in the backend reply
    #[error("No structured object in reply: {0}")]
    NoJsonObject(String),
}
