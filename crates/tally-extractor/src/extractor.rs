//! Core extraction implementation

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tally_domain::{AnalysisBackend, Document, MetricSchema};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::instruction::InstructionBuilder;
use crate::parser::parse_backend_reply;
use crate::types::DocumentExtraction;

/// Backstop over the backend's own request timeout
const TIMEOUT_GRACE: Duration = Duration::from_secs(5);

/// Extracts one document's metrics through an analysis backend
///
/// The backend trait is synchronous; each call runs on the blocking
/// pool under an overall timeout. Failures never propagate out of
/// [`MetricExtractor::extract`]: they are captured on the returned
/// result.
pub struct MetricExtractor<B: AnalysisBackend> {
    backend: Arc<B>,
    config: ExtractorConfig,
}

impl<B> MetricExtractor<B>
where
    B: AnalysisBackend + 'static,
{
    /// Create an extractor around a backend
    pub fn new(backend: B, config: ExtractorConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            config,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract all schema metrics from one document
    ///
    /// Always returns a result row: any failure (oversize document,
    /// backend error, timeout, unparsable reply) is recorded on the
    /// row's `error` and logged, never thrown.
    pub async fn extract(
        &self,
        document: Document,
        schema: &MetricSchema,
        spec_text: &str,
    ) -> DocumentExtraction {
        let label = document.label.clone();

        match self.extract_values(document, schema, spec_text).await {
            Ok(values) => DocumentExtraction::success(label, values),
            Err(e) => {
                warn!("Extraction failed for '{}': {}", label, e);
                DocumentExtraction::failure(label, e.to_string())
            }
        }
    }

    /// Fallible core: instruction, backend call, reply parse
    async fn extract_values(
        &self,
        document: Document,
        schema: &MetricSchema,
        spec_text: &str,
    ) -> Result<Map<String, Value>, ExtractError> {
        if document.len() > self.config.max_document_bytes {
            return Err(ExtractError::DocumentTooLarge(
                document.len(),
                self.config.max_document_bytes,
            ));
        }

        let instruction = InstructionBuilder::new(schema, spec_text).build();
        debug!(
            "Analyzing '{}' ({} bytes, instruction {} chars)",
            document.label,
            document.len(),
            instruction.len()
        );

        let reply = timeout(
            self.config.request_timeout() + TIMEOUT_GRACE,
            self.call_backend(document, instruction),
        )
        .await
        .map_err(|_| ExtractError::Timeout)??;

        debug!("Reply length: {} chars", reply.len());

        parse_backend_reply(&reply)
    }

    /// Run the synchronous backend call on the blocking pool
    async fn call_backend(
        &self,
        document: Document,
        instruction: String,
    ) -> Result<String, ExtractError> {
        let backend = Arc::clone(&self.backend);

        tokio::task::spawn_blocking(move || {
            backend
                .analyze(&document, &instruction)
                .map_err(|e| ExtractError::Backend(e.to_string()))
        })
        .await
        .map_err(|e| ExtractError::Backend(format!("Task join error: {}", e)))?
    }
}
