//! Configuration for artifact retention and sweeping

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the artifact registry
///
/// Controls how long generated artifacts stay downloadable and how often
/// the background sweeper runs.
///
/// # Examples
///
/// ```
/// use tally_registry::RegistryConfig;
///
/// let config = RegistryConfig::default();
/// assert_eq!(config.retention_secs, 3600);
/// assert_eq!(config.sweep_interval_secs, 60);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// How long an artifact stays resolvable after registration (in seconds)
    /// Default: 3600 (one hour)
    pub retention_secs: u64,

    /// How often the background sweeper runs (in seconds)
    /// Default: 60
    pub sweep_interval_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            retention_secs: 3600,
            sweep_interval_secs: 60,
        }
    }
}

impl RegistryConfig {
    /// Get retention as Duration
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    /// Get sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}
