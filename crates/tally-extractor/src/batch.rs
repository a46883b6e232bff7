//! Batch orchestration across documents

use tally_domain::{AnalysisBackend, Document, DocumentSource, MetricSchema};
use tracing::{info, warn};

use crate::error::ExtractError;
use crate::extractor::MetricExtractor;
use crate::types::DocumentExtraction;

/// Run a batch of documents through the extractor, strictly in order
///
/// Documents are processed sequentially, never concurrently, with the
/// configured delay between consecutive backend calls (skipped after the
/// last document, applied whether the previous document succeeded or
/// failed). One result is returned per input, in input order; a failure
/// is confined to its own row and never aborts the batch.
///
/// Staged files are read once and deleted afterwards, on success and
/// failure alike. A failed deletion is logged and ignored.
pub async fn run_batch<B>(
    extractor: &MetricExtractor<B>,
    sources: Vec<DocumentSource>,
    schema: &MetricSchema,
    spec_text: &str,
) -> Vec<DocumentExtraction>
where
    B: AnalysisBackend + 'static,
{
    let total = sources.len();
    let mut results = Vec::with_capacity(total);

    for (idx, source) in sources.into_iter().enumerate() {
        info!(
            "Processing document {}/{}: {}",
            idx + 1,
            total,
            source.label()
        );

        let result = process_source(extractor, source, schema, spec_text).await;
        if let Some(error) = &result.error {
            info!("Document {}/{} failed: {}", idx + 1, total, error);
        }
        results.push(result);

        let delay = extractor.config().call_delay();
        if idx + 1 < total && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    results
}

/// Extract one source, resolving staged files to in-memory documents
async fn process_source<B>(
    extractor: &MetricExtractor<B>,
    source: DocumentSource,
    schema: &MetricSchema,
    spec_text: &str,
) -> DocumentExtraction
where
    B: AnalysisBackend + 'static,
{
    match source {
        DocumentSource::Memory(document) => extractor.extract(document, schema, spec_text).await,
        DocumentSource::TransientFile {
            label,
            media_type,
            path,
        } => {
            let outcome = match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    let document = Document::new(label.clone(), media_type, bytes);
                    extractor.extract(document, schema, spec_text).await
                }
                Err(e) => {
                    warn!("Failed to read staged file {}: {}", path.display(), e);
                    DocumentExtraction::failure(
                        label,
                        ExtractError::Unreadable(e.to_string()).to_string(),
                    )
                }
            };

            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!("Failed to delete staged file {}: {}", path.display(), e);
            }

            outcome
        }
    }
}
