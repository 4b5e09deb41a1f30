//! Configuration for the vault and bundle pipeline

use crate::vault::SecretVault;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Environment variable the CLI reads the vault password from
pub const VAULT_PASSWORD_ENV: &str = "BUNDLE_VAULT_PASSWORD";

/// Environment variable the CLI reads a plaintext private key from
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// What the scheduler does after a bundle fails for good
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and keep going with the next bundle
    #[default]
    BestEffort,
    /// Stop dispatching the remaining bundles
    FailFast,
}

/// Bundle submission settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleSettings {
    /// Requests per bundle
    pub bundle_size: usize,
    /// Base pause between bundles (milliseconds), before jitter
    pub interval_ms: u64,
    /// Retries per bundle after the first attempt
    pub max_retries: u32,
    /// Backoff before the first retry (milliseconds), doubled per retry
    pub retry_backoff_ms: u64,
    /// Upper bound on a single backoff (milliseconds)
    pub max_backoff_ms: u64,
    /// Failed-bundle policy
    pub failure_policy: FailurePolicy,
}

impl Default for BundleSettings {
    fn default() -> Self {
        Self {
            bundle_size: 5,
            interval_ms: 200,
            max_retries: 3,
            retry_backoff_ms: 250,
            max_backoff_ms: 5_000,
            failure_policy: FailurePolicy::BestEffort,
        }
    }
}

impl BundleSettings {
    /// Recommended bundle size range
    pub const BUNDLE_SIZE_RANGE: (usize, usize) = (1, 25);
    /// Recommended interval range (milliseconds)
    pub const INTERVAL_MS_RANGE: (u64, u64) = (100, 5_000);
    /// Recommended retry range
    pub const MAX_RETRIES_RANGE: (u32, u32) = (0, 10);

    /// Reject settings the scheduler cannot run with.
    ///
    /// Values outside the recommended ranges are allowed but logged.
    pub fn validate(&self) -> Result<()> {
        if self.bundle_size == 0 {
            return Err(Error::InvalidParameter(
                "bundle_size must be greater than 0".to_string(),
            ));
        }

        let (lo, hi) = Self::BUNDLE_SIZE_RANGE;
        if self.bundle_size > hi {
            warn!(
                bundle_size = self.bundle_size,
                recommended_min = lo,
                recommended_max = hi,
                "Bundle size outside recommended range"
            );
        }
        let (lo, hi) = Self::INTERVAL_MS_RANGE;
        if !(lo..=hi).contains(&self.interval_ms) {
            warn!(
                interval_ms = self.interval_ms,
                recommended_min = lo,
                recommended_max = hi,
                "Bundle interval outside recommended range"
            );
        }
        let (lo, hi) = Self::MAX_RETRIES_RANGE;
        if !(lo..=hi).contains(&self.max_retries) {
            warn!(
                max_retries = self.max_retries,
                recommended_min = lo,
                recommended_max = hi,
                "Retry count outside recommended range"
            );
        }
        Ok(())
    }
}

/// Vault settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultSettings {
    /// PBKDF2 rounds (minimum 100,000).
    ///
    /// Sealed secrets do not record the round count, so this must stay
    /// fixed for as long as secrets sealed under it are kept. Changing it
    /// makes every existing blob fail with `WrongPasswordOrCorruptData`.
    pub kdf_iterations: u32,
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            kdf_iterations: crate::vault::kdf::DEFAULT_ITERATIONS,
        }
    }
}

/// Simulated sink behaviour for the CLI demo
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Fastest simulated submission (milliseconds)
    pub min_latency_ms: u64,
    /// Slowest simulated submission (milliseconds)
    pub max_latency_ms: u64,
    /// Probability (0.0-1.0) that a single submission fails
    pub failure_rate: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            min_latency_ms: 50,
            max_latency_ms: 150,
            failure_rate: 0.0,
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bundle pipeline settings
    pub bundles: BundleSettings,
    /// Vault settings
    pub vault: VaultSettings,
    /// Simulated sink settings
    pub simulation: SimulationSettings,
}

impl Config {
    /// Load from a JSON file; missing sections take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        self.bundles.validate()?;

        SecretVault::new(&self.vault)?;

        let sim = &self.simulation;
        if sim.min_latency_ms > sim.max_latency_ms {
            return Err(Error::Config(
                "simulation.min_latency_ms exceeds max_latency_ms".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&sim.failure_rate) {
            return Err(Error::Config(
                "simulation.failure_rate must be between 0.0 and 1.0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bundles.bundle_size, 5);
        assert_eq!(config.bundles.interval_ms, 200);
        assert_eq!(config.bundles.max_retries, 3);
        assert_eq!(config.bundles.failure_policy, FailurePolicy::BestEffort);
        assert_eq!(config.vault.kdf_iterations, 100_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_deserializes() {
        let value = serde_json::json!({
            "bundles": { "bundle_size": 10, "failure_policy": "fail_fast" }
        });
        let parsed: Config = serde_json::from_value(value).expect("parse config");
        assert_eq!(parsed.bundles.bundle_size, 10);
        assert_eq!(parsed.bundles.interval_ms, 200);
        assert_eq!(parsed.bundles.failure_policy, FailurePolicy::FailFast);
        assert_eq!(parsed.simulation.max_latency_ms, 150);
    }

    #[test]
    fn test_zero_bundle_size_rejected() {
        let settings = BundleSettings {
            bundle_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_out_of_range_values_only_warn() {
        let settings = BundleSettings {
            bundle_size: 100,
            interval_ms: 10,
            max_retries: 50,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "bundles": {{ "interval_ms": 500 }}, "simulation": {{ "failure_rate": 0.25 }} }}"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.bundles.interval_ms, 500);
        assert_eq!(config.simulation.failure_rate, 0.25);
    }

    #[test]
    fn test_from_file_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "vault": {{ "kdf_iterations": 1000 }} }}"#).unwrap();
        assert!(matches!(
            Config::from_file(file.path()),
            Err(Error::InvalidParameter(_))
        ));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "simulation": {{ "failure_rate": 1.5 }} }}"#).unwrap();
        assert!(matches!(
            Config::from_file(file.path()),
            Err(Error::Config(_))
        ));
    }
}
