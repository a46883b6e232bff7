//! Tally Registry
//!
//! Ephemeral store for generated artifacts, keyed by run id.
//!
//! # Overview
//!
//! Artifacts are download-once conveniences, not records: every entry
//! expires a fixed interval after registration, and eviction removes
//! both the registry entry and the file on disk. The registry enforces
//! expiry two ways:
//!
//! - **Lazily**: a lookup that finds an expired entry evicts it and
//!   reports the artifact as unknown
//! - **Eagerly**: a background sweeper reclaims artifacts nobody
//!   downloaded
//!
//! Lookups never extend an entry's lifetime.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use tally_registry::{ArtifactRecord, ArtifactRegistry, RegistryConfig, RegistrySweeper};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = RegistryConfig::default();
//!     let registry = Arc::new(ArtifactRegistry::new(config.clone()));
//!
//!     registry.insert(
//!         "0190a8b2-5c4e-7000-8000-000000000000",
//!         ArtifactRecord::new("outputs/tally_run.xlsx".into(), "tally_run.xlsx", 3),
//!     );
//!
//!     let sweeper = RegistrySweeper::new(Arc::clone(&registry), &config);
//!     tokio::spawn(async move { sweeper.run().await });
//!
//!     if let Some(record) = registry.resolve("0190a8b2-5c4e-7000-8000-000000000000") {
//!         println!("Artifact ready: {}", record.path.display());
//!     }
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [registry]
//! retention_secs = 3600
//! sweep_interval_secs = 60
//! ```
//!
//! # Testing
//!
//! Time is injectable through the [`Clock`] trait; tests drive a
//! [`ManualClock`] instead of sleeping through retention windows.

#![warn(missing_docs)]

mod clock;
mod config;
mod registry;
mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RegistryConfig;
pub use registry::{ArtifactRecord, ArtifactRegistry};
pub use sweeper::RegistrySweeper;
