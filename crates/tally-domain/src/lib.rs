//! Tally Domain Layer
//!
//! This crate contains the core business logic and domain model for Tally.
//! It defines the fundamental concepts, value objects, and trait interfaces
//! that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **MetricDefinition**: One named, typed metric to extract from documents
//! - **MetricSchema**: The ordered list of metrics for one batch run
//! - **CellValue**: A normalized table cell (empty, error, number, or text)
//! - **Document**: Raw document bytes with a label and media type
//! - **RunId**: UUIDv7 identifier for one batch run
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture:
//! - Pure business logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cell;
pub mod document;
pub mod metric;
pub mod run;
pub mod schema;
pub mod traits;

// Re-exports for convenience
pub use cell::CellValue;
pub use document::{Document, DocumentSource};
pub use metric::{MetricDefinition, MetricType};
pub use run::RunId;
pub use schema::MetricSchema;
pub use traits::AnalysisBackend;
