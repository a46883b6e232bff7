//! Configuration for batch extraction

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the extractor and batch orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum size of a single document (bytes)
    pub max_document_bytes: usize,

    /// Maximum number of documents per batch
    pub max_documents: usize,

    /// Maximum time for a single backend call (seconds)
    pub request_timeout_secs: u64,

    /// Delay between consecutive backend calls (milliseconds)
    pub call_delay_ms: u64,
}

impl ExtractorConfig {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the inter-call delay as a Duration
    pub fn call_delay(&self) -> Duration {
        Duration::from_millis(self.call_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_document_bytes == 0 {
            return Err("max_document_bytes must be greater than 0".to_string());
        }
        if self.max_documents == 0 {
            return Err("max_documents must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration: provider rate-limit etiquette intact
    fn default() -> Self {
        Self {
            max_document_bytes: 32 * 1024 * 1024,
            max_documents: 20,
            request_timeout_secs: 180,
            call_delay_ms: 1000,
        }
    }
}

impl ExtractorConfig {
    /// Unthrottled preset: no inter-call delay, for tests and local mocks
    pub fn unthrottled() -> Self {
        Self {
            call_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_documents, 20);
        assert_eq!(config.max_document_bytes, 32 * 1024 * 1024);
        assert_eq!(config.call_delay(), Duration::from_secs(1));
        assert_eq!(config.request_timeout(), Duration::from_secs(180));
    }

    #[test]
    fn test_unthrottled_config_is_valid() {
        let config = ExtractorConfig::unthrottled();
        assert!(config.validate().is_ok());
        assert_eq!(config.call_delay(), Duration::ZERO);
    }

    #[test]
    fn test_invalid_max_document_bytes() {
        let mut config = ExtractorConfig::default();
        config.max_document_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_request_timeout() {
        let mut config = ExtractorConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.max_document_bytes, parsed.max_document_bytes);
        assert_eq!(config.max_documents, parsed.max_documents);
        assert_eq!(config.request_timeout_secs, parsed.request_timeout_secs);
        assert_eq!(config.call_delay_ms, parsed.call_delay_ms);
    }
}
