//! Error types for workbook generation

use thiserror::Error;

/// Errors that can occur while building the artifact
///
/// Unlike per-document extraction failures, these abort the batch: a
/// partially written artifact is not usable.
#[derive(Error, Debug)]
pub enum WorkbookError {
    /// Spreadsheet library failure
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Output directory or file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
