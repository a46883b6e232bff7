//! Background worker for continuous registry sweeping

use std::sync::Arc;

use tokio::time::{interval, Duration};

use crate::clock::{Clock, SystemClock};
use crate::config::RegistryConfig;
use crate::registry::ArtifactRegistry;

/// Background worker that sweeps the registry on a schedule
///
/// Lazy eviction on lookup already keeps resolved entries honest; the
/// sweeper reclaims disk space for artifacts nobody ever downloads.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use tally_registry::{ArtifactRegistry, RegistryConfig, RegistrySweeper};
///
/// #[tokio::main]
/// async fn main() {
///     let config = RegistryConfig::default();
///     let registry = Arc::new(ArtifactRegistry::new(config.clone()));
///     let sweeper = RegistrySweeper::new(Arc::clone(&registry), &config);
///
///     // Run indefinitely (until Ctrl+C)
///     sweeper.run().await;
/// }
/// ```
pub struct RegistrySweeper<C: Clock = SystemClock> {
    registry: Arc<ArtifactRegistry<C>>,
    interval: Duration,
}

impl<C: Clock> RegistrySweeper<C> {
    /// Create a sweeper over a shared registry
    pub fn new(registry: Arc<ArtifactRegistry<C>>, config: &RegistryConfig) -> Self {
        Self {
            registry,
            interval: config.sweep_interval(),
        }
    }

    /// Run the sweeper indefinitely
    ///
    /// Sweeps at the configured interval until a shutdown signal
    /// (Ctrl+C) is received.
    pub async fn run(&self) {
        let mut ticker = interval(self.interval);

        tracing::info!("Artifact sweeper started (interval: {:?})", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::debug!("Starting sweep cycle");

                    let evicted = self.registry.sweep();
                    if evicted > 0 {
                        tracing::info!(
                            "Sweep completed: {} expired artifact(s) evicted",
                            evicted
                        );
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received, stopping sweeper");
                    break;
                }
            }
        }

        tracing::info!(
            "Artifact sweeper stopped ({} entries still registered)",
            self.registry.len()
        );
    }

    /// Run for a specific number of cycles (useful for testing)
    ///
    /// Returns the total number of entries evicted across the cycles.
    pub async fn run_cycles(&self, cycles: usize) -> usize {
        let mut ticker = interval(self.interval);
        let mut total = 0;

        for cycle in 0..cycles {
            ticker.tick().await;

            let evicted = self.registry.sweep();
            tracing::debug!(
                "Sweep {}/{} completed: {} evicted",
                cycle + 1,
                cycles,
                evicted
            );
            total += evicted;
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::registry::ArtifactRecord;
    use std::time::SystemTime;

    fn test_config() -> RegistryConfig {
        RegistryConfig {
            retention_secs: 10,
            sweep_interval_secs: 1,
        }
    }

    fn artifact_in(dir: &std::path::Path, name: &str) -> ArtifactRecord {
        let path = dir.join(name);
        std::fs::write(&path, b"xlsx bytes").unwrap();
        ArtifactRecord::new(path, name, 1)
    }

    #[tokio::test]
    async fn test_run_cycles_evicts_expired() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config();
        let clock = ManualClock::new(SystemTime::UNIX_EPOCH);
        let registry = Arc::new(ArtifactRegistry::with_clock(config.clone(), clock.clone()));

        registry.insert("run-1", artifact_in(dir.path(), "a.xlsx"));
        registry.insert("run-2", artifact_in(dir.path(), "b.xlsx"));
        clock.advance(Duration::from_secs(10));

        let sweeper = RegistrySweeper::new(Arc::clone(&registry), &config);
        let evicted = sweeper.run_cycles(1).await;

        assert_eq!(evicted, 2);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_run_cycles_leaves_fresh_entries() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config();
        let clock = ManualClock::new(SystemTime::UNIX_EPOCH);
        let registry = Arc::new(ArtifactRegistry::with_clock(config.clone(), clock.clone()));

        registry.insert("run-1", artifact_in(dir.path(), "a.xlsx"));
        clock.advance(Duration::from_secs(5));

        let sweeper = RegistrySweeper::new(Arc::clone(&registry), &config);
        let evicted = sweeper.run_cycles(1).await;

        assert_eq!(evicted, 0);
        assert_eq!(registry.len(), 1);
    }
}
