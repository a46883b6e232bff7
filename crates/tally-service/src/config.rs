//! Configuration for the service facade

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tally_extractor::ExtractorConfig;
use tally_registry::RegistryConfig;

/// Configuration for [`TallyService`](crate::TallyService)
///
/// Bundles the extraction limits, the artifact retention policy, and
/// the output directory for generated files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Batch limits, timeout, and throttling
    pub extractor: ExtractorConfig,

    /// Artifact retention and sweep schedule
    pub registry: RegistryConfig,

    /// Directory artifacts are written under; created if absent
    pub output_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            extractor: ExtractorConfig::default(),
            registry: RegistryConfig::default(),
            output_dir: PathBuf::from("outputs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();

        assert_eq!(config.extractor.max_documents, 20);
        assert_eq!(config.registry.retention_secs, 3600);
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = ServiceConfig::default();
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: ServiceConfig = serde_json::from_str(&serialized).unwrap();

        assert_eq!(config.extractor.max_documents, deserialized.extractor.max_documents);
        assert_eq!(config.registry.retention_secs, deserialized.registry.retention_secs);
        assert_eq!(config.output_dir, deserialized.output_dir);
    }
}
