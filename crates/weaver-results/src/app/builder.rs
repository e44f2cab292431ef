//! ResultStoreBuilder - ResultStore の構築
//!
//! # Fail-fast 設計
//! - namespace が空、または key の区切り文字を含む場合は build() で拒否
//! - 区切り文字を含む namespace は、別の (namespace, queue) の組と
//!   同じ canonical 文字列を作れてしまうため
//! - 設定の backoff が 0 の場合は config() で拒否（busy poll になるため）

use std::sync::Arc;
use std::time::Duration;

use super::config::{DEFAULT_NAMESPACE, DEFAULT_TIMEOUT_MS, ResultStoreConfig};
use super::result_store::ResultStore;
use crate::domain::KEY_SEPARATOR;
use crate::impls::ExponentialBackoff;
use crate::ports::{BackoffPolicy, StorageDriver};

/// BuildError は ResultStore 構築時のエラー
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("namespace must not be empty")]
    EmptyNamespace,

    #[error("namespace {0:?} must not contain the key separator '{sep}'", sep = KEY_SEPARATOR)]
    NamespaceContainsSeparator(String),

    #[error("backoff factor_ms={factor_ms} and max_backoff_ms={max_backoff_ms} must both be positive")]
    ZeroBackoff { factor_ms: u64, max_backoff_ms: u64 },
}

/// # 使用例
/// ```ignore
/// let store = ResultStore::builder(Arc::new(InMemoryDriver::new()))
///     .namespace("staging")
///     .default_timeout(Duration::from_secs(5))
///     .build()?;
/// ```
pub struct ResultStoreBuilder<D: ?Sized, B = ExponentialBackoff> {
    driver: Arc<D>,
    namespace: String,
    default_timeout: Duration,
    backoff: B,
}

impl<D: StorageDriver + ?Sized> ResultStoreBuilder<D, ExponentialBackoff> {
    pub fn new(driver: Arc<D>) -> Self {
        Self {
            driver,
            namespace: DEFAULT_NAMESPACE.to_string(),
            default_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            backoff: ExponentialBackoff::default(),
        }
    }
}

impl<D: StorageDriver + ?Sized, B: BackoffPolicy> ResultStoreBuilder<D, B> {
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Timeout used by blocking gets that don't pass their own.
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn backoff<B2: BackoffPolicy>(self, backoff: B2) -> ResultStoreBuilder<D, B2> {
        ResultStoreBuilder {
            driver: self.driver,
            namespace: self.namespace,
            default_timeout: self.default_timeout,
            backoff,
        }
    }

    /// Apply every setting from `config`, replacing the backoff policy.
    pub fn config(
        self,
        config: &ResultStoreConfig,
    ) -> Result<ResultStoreBuilder<D, ExponentialBackoff>, BuildError> {
        Ok(self
            .backoff(config.backoff.to_policy()?)
            .namespace(config.namespace.clone())
            .default_timeout(config.default_timeout()))
    }

    pub fn build(self) -> Result<ResultStore<D, B>, BuildError> {
        if self.namespace.is_empty() {
            return Err(BuildError::EmptyNamespace);
        }
        if self.namespace.contains(KEY_SEPARATOR) {
            return Err(BuildError::NamespaceContainsSeparator(self.namespace));
        }
        Ok(ResultStore::from_parts(
            self.namespace,
            self.driver,
            self.backoff,
            self.default_timeout,
        ))
    }
}
