//! ResultStore configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config:
//!
//! ```json
//! {
//!   "namespace": "weaver-results",
//!   "default_timeout_ms": 10000,
//!   "backoff": { "factor_ms": 50, "max_backoff_ms": 2000, "jitter": true }
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::builder::BuildError;
use crate::impls::ExponentialBackoff;
use crate::impls::backoff::{DEFAULT_FACTOR, DEFAULT_MAX_BACKOFF, DEFAULT_MAX_EXPONENT};

pub const DEFAULT_NAMESPACE: &str = "weaver-results";

/// Default wait for a blocking get, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultStoreConfig {
    pub namespace: String,
    pub default_timeout_ms: u64,
    pub backoff: BackoffConfig,
}

impl ResultStoreConfig {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }
}

impl Default for ResultStoreConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            backoff: BackoffConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    pub factor_ms: u64,
    pub max_backoff_ms: u64,
    pub jitter: bool,
}

impl BackoffConfig {
    /// Build the policy. A zero factor or cap would turn every blocking get
    /// into a busy poll, so both must be positive.
    pub fn to_policy(&self) -> Result<ExponentialBackoff, BuildError> {
        if self.factor_ms == 0 || self.max_backoff_ms == 0 {
            return Err(BuildError::ZeroBackoff {
                factor_ms: self.factor_ms,
                max_backoff_ms: self.max_backoff_ms,
            });
        }
        Ok(ExponentialBackoff {
            factor: Duration::from_millis(self.factor_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
            max_exponent: DEFAULT_MAX_EXPONENT,
            jitter: self.jitter,
        })
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            factor_ms: DEFAULT_FACTOR.as_millis() as u64,
            max_backoff_ms: DEFAULT_MAX_BACKOFF.as_millis() as u64,
            jitter: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = ResultStoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ResultStoreConfig::default());
        assert_eq!(config.namespace, "weaver-results");
        assert_eq!(config.default_timeout(), Duration::from_secs(10));
        assert_eq!(config.backoff.factor_ms, 50);
        assert_eq!(config.backoff.max_backoff_ms, 2_000);
        assert!(config.backoff.jitter);
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let config = ResultStoreConfig::from_json_str(
            r#"{ "namespace": "staging", "backoff": { "jitter": false } }"#,
        )
        .unwrap();

        assert_eq!(config.namespace, "staging");
        assert_eq!(config.default_timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.backoff.factor_ms, 50);
        assert!(!config.backoff.jitter);
    }

    #[test]
    fn backoff_config_builds_matching_policy() {
        let backoff = BackoffConfig {
            factor_ms: 10,
            max_backoff_ms: 80,
            jitter: false,
        };
        let policy = backoff.to_policy().unwrap();

        assert_eq!(policy.capped_delay(0), Duration::from_millis(10));
        assert_eq!(policy.capped_delay(3), Duration::from_millis(80));
        assert_eq!(policy.capped_delay(4), Duration::from_millis(80));
        assert!(!policy.jitter);
    }

    #[test]
    fn zero_backoff_is_rejected() {
        let config =
            ResultStoreConfig::from_json_str(r#"{ "backoff": { "factor_ms": 0 } }"#).unwrap();
        assert_eq!(
            config.backoff.to_policy().unwrap_err(),
            BuildError::ZeroBackoff {
                factor_ms: 0,
                max_backoff_ms: 2_000,
            }
        );

        let config =
            ResultStoreConfig::from_json_str(r#"{ "backoff": { "max_backoff_ms": 0 } }"#).unwrap();
        assert!(matches!(
            config.backoff.to_policy(),
            Err(BuildError::ZeroBackoff { max_backoff_ms: 0, .. })
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(ResultStoreConfig::from_json_str(r#"{ "default_timeout_ms": "soon" }"#).is_err());
    }
}
