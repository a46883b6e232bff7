//! Error types for the service facade

use thiserror::Error;

/// Batch-level errors
///
/// These reject a batch before any backend call. Per-document failures
/// never surface here; they ride in the receipt's outcome list.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The batch contained no documents
    #[error("No documents submitted")]
    NoDocuments,

    /// The batch exceeded the per-batch document limit
    #[error("Too many documents: {count} (max: {max})")]
    TooManyDocuments {
        /// Number of documents submitted
        count: usize,
        /// Configured per-batch limit
        max: usize,
    },

    /// The metric specification parsed to an empty schema
    #[error("Metric specification contains no metrics")]
    EmptySchema,

    /// Artifact generation failure
    #[error("Workbook error: {0}")]
    Workbook(#[from] tally_workbook::WorkbookError),

    /// Artifact file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
