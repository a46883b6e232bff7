//! Batch extraction facade

use std::sync::Arc;

use tally_domain::{AnalysisBackend, DocumentSource, MetricSchema, RunId};
use tally_extractor::{run_batch, MetricExtractor};
use tally_registry::{ArtifactRecord, ArtifactRegistry};
use tally_workbook::WorkbookBuilder;
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::receipt::BatchReceipt;

/// A downloadable artifact: file name plus full contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDownload {
    /// Bare file name, suitable for a download disposition header
    pub file_name: String,

    /// The artifact bytes
    pub bytes: Vec<u8>,
}

/// Facade wiring extraction, artifact generation, and the registry
///
/// One instance serves any number of batches; the registry is shared
/// so artifacts from earlier batches stay downloadable until their
/// retention window closes.
pub struct TallyService<B: AnalysisBackend + 'static> {
    extractor: MetricExtractor<B>,
    registry: Arc<ArtifactRegistry>,
    config: ServiceConfig,
}

impl<B> TallyService<B>
where
    B: AnalysisBackend + 'static,
{
    /// Create a service around a backend
    pub fn new(backend: B, config: ServiceConfig) -> Self {
        let registry = Arc::new(ArtifactRegistry::new(config.registry.clone()));
        let extractor = MetricExtractor::new(backend, config.extractor.clone());

        Self {
            extractor,
            registry,
            config,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The shared artifact registry
    ///
    /// Exposed so callers can attach a
    /// [`RegistrySweeper`](tally_registry::RegistrySweeper) in
    /// long-running deployments.
    pub fn registry(&self) -> Arc<ArtifactRegistry> {
        Arc::clone(&self.registry)
    }

    /// Run one batch end to end
    ///
    /// Parses the metric specification, validates the batch size, runs
    /// every document through the backend in order, writes the artifact,
    /// and registers it for download under a fresh run id.
    ///
    /// # Errors
    ///
    /// Fails before any backend call on an empty schema or an invalid
    /// document count, and afterwards only if the artifact cannot be
    /// written. Per-document extraction failures are not errors; they
    /// appear in the receipt's outcome list.
    pub async fn run_batch_extraction(
        &self,
        sources: Vec<DocumentSource>,
        metric_spec_text: &str,
    ) -> Result<BatchReceipt, ServiceError> {
        let schema = MetricSchema::parse(metric_spec_text);
        if schema.is_empty() {
            return Err(ServiceError::EmptySchema);
        }

        if sources.is_empty() {
            return Err(ServiceError::NoDocuments);
        }
        let max = self.extractor.config().max_documents;
        if sources.len() > max {
            return Err(ServiceError::TooManyDocuments {
                count: sources.len(),
                max,
            });
        }

        info!(
            "Starting batch: {} document(s), {} metric(s)",
            sources.len(),
            schema.len()
        );

        let results = run_batch(&self.extractor, sources, &schema, metric_spec_text).await;

        let run_id = RunId::new();
        let artifact =
            WorkbookBuilder::new(&schema, &results).write(run_id, &self.config.output_dir)?;

        self.registry.insert(
            run_id.to_string(),
            ArtifactRecord::new(
                artifact.path.clone(),
                artifact.file_name.clone(),
                results.len(),
            ),
        );

        let receipt = BatchReceipt::assemble(run_id, &artifact, &results);
        info!(
            "Batch {} complete: {}/{} document(s) succeeded",
            receipt.run_id, receipt.succeeded, receipt.total_documents
        );

        Ok(receipt)
    }

    /// Fetch a registered artifact by run id
    ///
    /// The id is parsed and canonicalized first, so any RFC 9562 textual
    /// form resolves. Returns `Ok(None)` for malformed or unknown ids
    /// and for expired entries. An entry whose backing file has gone
    /// missing is evicted and likewise reported as not found.
    ///
    /// # Errors
    ///
    /// Fails only on an I/O error other than the file being absent.
    pub fn download_artifact(&self, run_id: &str) -> Result<Option<ArtifactDownload>, ServiceError> {
        // Registry keys are the display form of a minted RunId
        let key = match RunId::from_string(run_id) {
            Ok(id) => id.to_string(),
            Err(reason) => {
                debug!("Rejected download request: {}", reason);
                return Ok(None);
            }
        };

        let record = match self.registry.resolve(&key) {
            Some(record) => record,
            None => return Ok(None),
        };

        match std::fs::read(&record.path) {
            Ok(bytes) => Ok(Some(ArtifactDownload {
                file_name: record.file_name,
                bytes,
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Artifact file for run {} is missing; evicting", key);
                self.registry.evict(&key);
                Ok(None)
            }
            Err(e) => Err(ServiceError::Io(e)),
        }
    }
}
