//! Configuration for the ETL pipeline
//!
//! One immutable bundle consumed by the pipeline at start. Defaults match the
//! source API's local development setup; every value can be overridden via
//! `HOMEWARD_*` environment variables or CLI flags.

use crate::retry::RetryPolicy;
use homeward_common::{HomewardError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Default base URL of the animal API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3123";

/// Default number of records per batch submission.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// The home endpoint rejects payloads above this many records.
pub const MAX_BATCH_SIZE: usize = 100;

/// Default number of retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default base delay before the first retry.
pub const DEFAULT_INITIAL_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Default cap on the backoff delay.
pub const DEFAULT_MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// ETL pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Base URL of the animal API (source and destination)
    pub base_url: String,

    /// Records per batch submitted to the home endpoint (1..=100)
    pub batch_size: usize,

    /// Retries after the initial attempt for each network operation
    pub max_retries: u32,

    /// Per-request timeout
    pub timeout: Duration,

    /// Base delay before the first retry
    pub initial_retry_delay: Duration,

    /// Cap on the backoff delay
    pub max_retry_delay: Duration,

    /// Assemble and count batches without submitting them
    #[serde(default)]
    pub dry_run: bool,

    /// Treat an unparseable birth timestamp as a validation failure instead
    /// of dropping the field
    #[serde(default)]
    pub strict_timestamps: bool,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            initial_retry_delay: DEFAULT_INITIAL_RETRY_DELAY,
            max_retry_delay: DEFAULT_MAX_RETRY_DELAY,
            dry_run: false,
            strict_timestamps: false,
        }
    }
}

impl EtlConfig {
    /// Load configuration from environment variables
    ///
    /// Recognized variables: `HOMEWARD_BASE_URL`, `HOMEWARD_BATCH_SIZE`,
    /// `HOMEWARD_MAX_RETRIES`, `HOMEWARD_TIMEOUT_SECS`,
    /// `HOMEWARD_RETRY_DELAY_SECS`, `HOMEWARD_MAX_RETRY_DELAY_SECS`,
    /// `HOMEWARD_DRY_RUN`, `HOMEWARD_STRICT_TIMESTAMPS`. Delay values accept
    /// fractional seconds.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("HOMEWARD_BASE_URL") {
            config.base_url = url;
        }

        if let Ok(size) = std::env::var("HOMEWARD_BATCH_SIZE") {
            config.batch_size = parse_var("HOMEWARD_BATCH_SIZE", &size)?;
        }

        if let Ok(retries) = std::env::var("HOMEWARD_MAX_RETRIES") {
            config.max_retries = parse_var("HOMEWARD_MAX_RETRIES", &retries)?;
        }

        if let Ok(secs) = std::env::var("HOMEWARD_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_var("HOMEWARD_TIMEOUT_SECS", &secs)?);
        }

        if let Ok(secs) = std::env::var("HOMEWARD_RETRY_DELAY_SECS") {
            config.initial_retry_delay =
                Duration::from_secs_f64(parse_var("HOMEWARD_RETRY_DELAY_SECS", &secs)?);
        }

        if let Ok(secs) = std::env::var("HOMEWARD_MAX_RETRY_DELAY_SECS") {
            config.max_retry_delay =
                Duration::from_secs_f64(parse_var("HOMEWARD_MAX_RETRY_DELAY_SECS", &secs)?);
        }

        if let Ok(val) = std::env::var("HOMEWARD_DRY_RUN") {
            config.dry_run = val == "1" || val.eq_ignore_ascii_case("true");
        }

        if let Ok(val) = std::env::var("HOMEWARD_STRICT_TIMESTAMPS") {
            config.strict_timestamps = val == "1" || val.eq_ignore_ascii_case("true");
        }

        Ok(config)
    }

    /// Check the configuration for values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(HomewardError::config("base URL must not be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(HomewardError::config(format!(
                "base URL '{}' must start with http:// or https://",
                self.base_url
            )));
        }

        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(HomewardError::config(format!(
                "batch size must be between 1 and {MAX_BATCH_SIZE}, got {}",
                self.batch_size
            )));
        }

        if self.timeout.is_zero() {
            return Err(HomewardError::config("timeout must be greater than zero"));
        }

        if self.max_retry_delay < self.initial_retry_delay {
            return Err(HomewardError::config(
                "max retry delay must not be below the initial retry delay",
            ));
        }

        Ok(())
    }

    /// Retry policy derived from this configuration
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            self.initial_retry_delay,
            self.max_retry_delay,
        )
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| HomewardError::config(format!("invalid value '{value}' for {name}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EtlConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let config = EtlConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_batch_rejected() {
        let config = EtlConfig {
            batch_size: MAX_BATCH_SIZE + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_scheme_rejected() {
        let config = EtlConfig {
            base_url: "ftp://animals.example.com".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_delays_rejected() {
        let config = EtlConfig {
            initial_retry_delay: Duration::from_secs(10),
            max_retry_delay: Duration::from_secs(1),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
