//! Tally Workbook
//!
//! Renders batch extraction results into a spreadsheet artifact.
//!
//! # Overview
//!
//! The workbook builder consumes one batch's results plus its metric
//! schema and produces a two-sheet xlsx file:
//!
//! - **Metrics**: one header row (`Document` + metric names), one data
//!   row per submitted document, numeric columns formatted by metric type
//! - **Summary**: generation timestamp, document counts, and the metric
//!   list with declared types
//!
//! # Key Guarantees
//!
//! - Row count always equals the number of submitted documents
//! - Column count always equals schema length + 1 (label column first)
//! - Failed documents render an explicit `Error` marker, distinct from
//!   a metric that was simply not found
//!
//! # Example Usage
//!
//! ```no_run
//! use tally_domain::{MetricSchema, RunId};
//! use tally_extractor::DocumentExtraction;
//! use tally_workbook::WorkbookBuilder;
//!
//! # fn example() -> Result<(), tally_workbook::WorkbookError> {
//! let schema = MetricSchema::parse("Company Name: text\nTransaction Value: number");
//! let results = vec![DocumentExtraction::failure("deal.pdf", "timed out")];
//!
//! let artifact = WorkbookBuilder::new(&schema, &results)
//!     .write(RunId::new(), "outputs".as_ref())?;
//!
//! println!("Artifact at {}", artifact.path.display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod artifact;
mod builder;
mod error;

pub use artifact::{Artifact, ArtifactSummary};
pub use builder::{NormalizedRow, WorkbookBuilder};
pub use error::WorkbookError;
