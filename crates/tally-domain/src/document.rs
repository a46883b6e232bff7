//! Document module - raw batch inputs

use std::path::PathBuf;

/// One document submitted for extraction
///
/// Documents carry their full bytes in memory; there is no streaming.
/// The label (typically the original file name) becomes the first cell
/// of the document's artifact row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// User-facing label, usually the original file name
    pub label: String,

    /// MIME type forwarded to the analysis backend
    pub media_type: String,

    /// Raw document bytes
    pub bytes: Vec<u8>,
}

impl Document {
    /// Create a document from its parts
    pub fn new(label: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Create a PDF document, the common case
    pub fn pdf(label: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(label, "application/pdf", bytes)
    }

    /// Size of the document in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the document has no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Where a batch document comes from
///
/// `Memory` documents are owned by the caller. `TransientFile` documents
/// are staged uploads: the orchestrator reads them once and deletes the
/// backing file afterwards, on success and failure alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Bytes already in memory
    Memory(Document),

    /// A staged file to read once and then delete
    TransientFile {
        /// User-facing label, usually the original file name
        label: String,

        /// MIME type forwarded to the analysis backend
        media_type: String,

        /// Path of the staged file
        path: PathBuf,
    },
}

impl DocumentSource {
    /// The user-facing label of the underlying document
    pub fn label(&self) -> &str {
        match self {
            DocumentSource::Memory(doc) => &doc.label,
            DocumentSource::TransientFile { label, .. } => label,
        }
    }
}
