//! Tally Service
//!
//! Facade over the full batch pipeline: metric schema parsing, document
//! extraction, artifact generation, and ephemeral artifact registration.
//!
//! # Overview
//!
//! One call runs a whole batch:
//!
//! 1. Parse the metric specification (empty schema rejects the batch)
//! 2. Validate the document count against the configured limit
//! 3. Extract every document in order; failures stay per-document
//! 4. Render the two-sheet xlsx artifact
//! 5. Register the artifact under a fresh run id for later download
//!
//! The returned [`BatchReceipt`] carries the run id, the counts, the
//! artifact location, and one outcome per document.
//!
//! # Example Usage
//!
//! ```no_run
//! use tally_domain::{Document, DocumentSource};
//! use tally_llm::AnthropicBackend;
//! use tally_service::{ServiceConfig, TallyService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = AnthropicBackend::from_env("claude-3-opus-20240229")?;
//! let service = TallyService::new(backend, ServiceConfig::default());
//!
//! let sources = vec![DocumentSource::Memory(Document::pdf(
//!     "contract.pdf",
//!     std::fs::read("contract.pdf")?,
//! ))];
//!
//! let receipt = service
//!     .run_batch_extraction(sources, "Contract Value: number\nVendor: text")
//!     .await?;
//! println!("Artifact: {}", receipt.path.display());
//!
//! let download = service.download_artifact(&receipt.run_id)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod receipt;
mod service;


pub use config::ServiceConfig;
pub use error::ServiceError;
pub use receipt::{BatchReceipt, DocumentOutcome};
pub use service::{ArtifactDownload, TallyService};
