//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Infrastructure implementations live in other crates.

use crate::Document;

/// Trait for the external document-analysis backend
///
/// Implemented by the infrastructure layer (tally-llm). The backend
/// takes one document plus a natural-language instruction and returns
/// free-form reply text expected to embed one structured object; reply
/// parsing is the caller's concern.
///
/// Implementations are synchronous; async callers run them on a
/// blocking task.
pub trait AnalysisBackend: Send + Sync {
    /// Error type for backend operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Analyze one document against an instruction, returning reply text
    fn analyze(&self, document: &Document, instruction: &str) -> Result<String, Self::Error>;
}
