//! Tally Extractor
//!
//! Per-document metric extraction and batch orchestration.
//!
//! # Overview
//!
//! The Extractor turns one document plus a metric schema into a mapping of
//! metric name to raw extracted value, by way of an analysis backend. The
//! batch orchestrator drives the extractor across N documents strictly in
//! sequence, isolating each document's failures to its own result row.
//!
//! # Architecture
//!
//! ```text
//! Documents → run_batch → MetricExtractor → AnalysisBackend
//!                                         → parse_backend_reply → DocumentExtraction
//! ```
//!
//! # Key Features
//!
//! - **Instruction Engineering**: Schema-derived extraction instructions
//! - **Lenient Reply Parsing**: First balanced JSON object, prose-tolerant
//! - **Failure Isolation**: One bad document never aborts the batch
//! - **Rate-Limit Etiquette**: Sequential calls with a configurable delay
//! - **Transient Files**: Staged uploads read once, deleted on every path
//!
//! # Example Usage
//!
//! ```no_run
//! use tally_domain::{Document, DocumentSource, MetricSchema};
//! use tally_extractor::{run_batch, ExtractorConfig, MetricExtractor};
//! use tally_llm::MockBackend;
//!
//! # async fn example() {
//! let spec = "Company Name: text\nTransaction Value: number";
//! let schema = MetricSchema::parse(spec);
//!
//! let backend = MockBackend::new(r#"{"Company Name": "Acme"}"#);
//! let extractor = MetricExtractor::new(backend, ExtractorConfig::default());
//!
//! let sources = vec![DocumentSource::Memory(Document::pdf("deal.pdf", vec![]))];
//! let results = run_batch(&extractor, sources, &schema, spec).await;
//!
//! assert_eq!(results.len(), 1);
//! # }
//! ```

#![warn(missing_docs)]

mod batch;
mod config;
mod error;
mod extractor;
mod instruction;
mod parser;
mod types;

#[cfg(test)]
mod tests;

pub use batch::run_batch;
pub use config::ExtractorConfig;
pub use error::ExtractError;
pub use extractor::MetricExtractor;
pub use instruction::InstructionBuilder;
pub use parser::parse_backend_reply;
pub use types::DocumentExtraction;
