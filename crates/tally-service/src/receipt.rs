//! Serializable batch outcome summary

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tally_domain::RunId;
use tally_extractor::DocumentExtraction;
use tally_workbook::Artifact;

/// One document's outcome within a receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOutcome {
    /// Document label, usually the original file name
    pub label: String,

    /// Whether extraction completed for this document
    pub ok: bool,

    /// Failure description when it did not
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary returned to the caller for one completed batch
///
/// The `run_id` is the download key for the artifact while it stays
/// within its retention window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReceipt {
    /// Run id of the batch, in UUID string form
    pub run_id: String,

    /// Number of documents submitted
    pub total_documents: usize,

    /// Documents extracted without error
    pub succeeded: usize,

    /// Documents that failed entirely
    pub failed: usize,

    /// Artifact file name
    pub file_name: String,

    /// Artifact path on disk
    pub path: PathBuf,

    /// Per-document outcomes, in submission order
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReceipt {
    /// Assemble a receipt from the written artifact and the batch results
    pub fn assemble(run_id: RunId, artifact: &Artifact, results: &[DocumentExtraction]) -> Self {
        let outcomes = results
            .iter()
            .map(|result| DocumentOutcome {
                label: result.label.clone(),
                ok: !result.is_failure(),
                error: result.error.clone(),
            })
            .collect();

        Self {
            run_id: run_id.to_string(),
            total_documents: artifact.summary.total_documents,
            succeeded: artifact.summary.succeeded,
            failed: artifact.summary.failed,
            file_name: artifact.file_name.clone(),
            path: artifact.path.clone(),
            outcomes,
        }
    }
}
