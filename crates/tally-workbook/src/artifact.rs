//! Artifact metadata types

use std::path::PathBuf;

use chrono::{DateTime, Local};
use tally_extractor::DocumentExtraction;

/// Per-batch counts echoed into the artifact's Summary sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSummary {
    /// Number of documents submitted to the batch
    pub total_documents: usize,

    /// Documents whose extraction completed without an error
    pub succeeded: usize,

    /// Documents whose extraction failed entirely
    pub failed: usize,

    /// Local time the artifact was generated
    pub generated_at: DateTime<Local>,
}

impl ArtifactSummary {
    /// Tally the counts for one batch's results
    pub fn tally(results: &[DocumentExtraction]) -> Self {
        let failed = results.iter().filter(|r| r.is_failure()).count();
        Self {
            total_documents: results.len(),
            succeeded: results.len() - failed,
            failed,
            generated_at: Local::now(),
        }
    }
}

/// A generated tabular artifact on disk
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Full path of the xlsx file
    pub path: PathBuf,

    /// Bare file name, suitable for a download disposition header
    pub file_name: String,

    /// Counts and timestamp written to the Summary sheet
    pub summary: ArtifactSummary,
}
