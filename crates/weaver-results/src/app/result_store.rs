//! ResultStore - result の保存と取得（blocking get 付き）
//!
//! # フロー
//! - store: key 導出 → StorageDriver::put(key, bytes, ttl)
//! - get:   key 導出 → StorageDriver::get(key)
//!   - 見つかれば即返す
//!   - block=false なら None を即返す
//!   - block=true なら BackoffPolicy で次の待ち時間を決め、
//!     deadline を超えるなら待たずに None、超えないなら sleep して再試行
//!
//! 「タイムアウトした」と「一度だけ見て無かった」はどちらも `Ok(None)`。
//! driver の失敗だけが `Err` になる。

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::builder::ResultStoreBuilder;
use crate::domain::{Message, MessageKey};
use crate::error::ResultError;
use crate::impls::ExponentialBackoff;
use crate::ports::{BackoffPolicy, StorageDriver};

/// How a get should wait.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// Poll until the result shows up or the timeout runs out.
    pub block: bool,
    /// `None` falls back to the store's default timeout.
    pub timeout: Option<Duration>,
}

impl GetOptions {
    /// Single lookup, never sleeps.
    pub fn non_blocking() -> Self {
        Self::default()
    }

    pub fn blocking() -> Self {
        Self {
            block: true,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Facade for storing and retrieving task results by message identity.
///
/// Holds no mutable state: concurrent `get`/`store` calls on one instance
/// need no coordination. The driver is shared with whoever built the store.
pub struct ResultStore<D: ?Sized, B = ExponentialBackoff> {
    namespace: String,
    driver: Arc<D>,
    backoff: B,
    default_timeout: Duration,
}

impl<D: StorageDriver + ?Sized> ResultStore<D, ExponentialBackoff> {
    pub fn builder(driver: Arc<D>) -> ResultStoreBuilder<D, ExponentialBackoff> {
        ResultStoreBuilder::new(driver)
    }
}

impl<D: StorageDriver + ?Sized, B: BackoffPolicy> ResultStore<D, B> {
    pub(crate) fn from_parts(
        namespace: String,
        driver: Arc<D>,
        backoff: B,
        default_timeout: Duration,
    ) -> Self {
        Self {
            namespace,
            driver,
            backoff,
            default_timeout,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    pub fn driver(&self) -> &Arc<D> {
        &self.driver
    }

    /// Key under which `message`'s result lives in this store's namespace.
    pub fn build_message_key(&self, message: &Message) -> MessageKey {
        MessageKey::derive(&self.namespace, message)
    }

    /// Fetch the raw result bytes of `message`.
    pub async fn get_bytes(
        &self,
        message: &Message,
        options: GetOptions,
    ) -> Result<Option<Vec<u8>>, ResultError> {
        self.poll(message, options, None).await
    }

    /// Like [`get_bytes`](Self::get_bytes), but a blocking wait ends with
    /// `ResultError::Cancelled` as soon as `cancel` fires.
    pub async fn get_bytes_with_cancel(
        &self,
        message: &Message,
        options: GetOptions,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<u8>>, ResultError> {
        self.poll(message, options, Some(cancel)).await
    }

    /// Fetch and JSON-decode the result of `message`.
    pub async fn get_result<T: DeserializeOwned>(
        &self,
        message: &Message,
        options: GetOptions,
    ) -> Result<Option<T>, ResultError> {
        self.get_bytes(message, options)
            .await?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    pub async fn get_result_with_cancel<T: DeserializeOwned>(
        &self,
        message: &Message,
        options: GetOptions,
        cancel: &CancellationToken,
    ) -> Result<Option<T>, ResultError> {
        self.get_bytes_with_cancel(message, options, cancel)
            .await?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    /// Store raw result bytes for `message`. `ttl` is passed to the driver as is.
    pub async fn store_bytes(
        &self,
        message: &Message,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), ResultError> {
        let key = self.build_message_key(message);
        self.driver
            .put(&key, value, ttl)
            .await
            .inspect_err(|e| warn!(%key, error = %e, "failed to store result"))?;

        debug!(%key, actor = message.actor_name(), ?ttl, "result stored");
        Ok(())
    }

    /// JSON-encode `result` and store it for `message`.
    pub async fn store_result<T: Serialize + ?Sized>(
        &self,
        message: &Message,
        result: &T,
        ttl: Duration,
    ) -> Result<(), ResultError> {
        let bytes = serde_json::to_vec(result).map_err(ResultError::Encode)?;
        self.store_bytes(message, bytes, ttl).await
    }

    async fn poll(
        &self,
        message: &Message,
        options: GetOptions,
        cancel: Option<&CancellationToken>,
    ) -> Result<Option<Vec<u8>>, ResultError> {
        let key = self.build_message_key(message);
        let timeout = options.timeout.unwrap_or(self.default_timeout);
        // None: the timeout is too large to represent, so wait without a deadline.
        let deadline = Instant::now().checked_add(timeout);
        let mut attempt: u32 = 0;

        loop {
            let data = self
                .driver
                .get(&key)
                .await
                .inspect_err(|e| warn!(%key, error = %e, "failed to fetch result"))?;

            if let Some(data) = data {
                debug!(%key, attempt, "result found");
                return Ok(Some(data));
            }

            if !options.block {
                debug!(%key, "result not ready");
                return Ok(None);
            }

            if let Some(token) = cancel
                && token.is_cancelled()
            {
                debug!(%key, attempt, "wait for result cancelled");
                return Err(ResultError::Cancelled);
            }

            let delay = self.backoff.next_delay(attempt);
            if !fits_before_deadline(Instant::now(), delay, deadline) {
                debug!(%key, attempts = attempt + 1, ?timeout, "timed out waiting for result");
                return Ok(None);
            }

            trace!(%key, attempt, ?delay, "result not ready, backing off");
            attempt = attempt.saturating_add(1);

            match cancel {
                Some(token) => {
                    tokio::select! {
                        _ = token.cancelled() => {
                            debug!(%key, attempt, "wait for result cancelled");
                            return Err(ResultError::Cancelled);
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                None => tokio::time::sleep(delay).await,
            }
        }
    }
}

/// Whether sleeping `delay` from `now` still ends by `deadline`.
///
/// An already-reached deadline never fits, even for a zero delay.
fn fits_before_deadline(now: Instant, delay: Duration, deadline: Option<Instant>) -> bool {
    let Some(deadline) = deadline else {
        return true;
    };
    now < deadline && now.checked_add(delay).is_some_and(|wake| wake <= deadline)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ResultError> {
    serde_json::from_slice(bytes).map_err(ResultError::Decode)
}
