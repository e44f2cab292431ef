//! StorageDriver port - result の保存先（Redis / Memcached / InMemory）
//!
//! StorageDriver は key と bytes の get/put だけを提供します。
//! 待機（blocking get）やリトライは ResultStore 側の責務です。

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::MessageKey;

/// Failure reported by a storage backend.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("operation failed: {0}")]
    OperationFailed(String),
}

/// StorageDriver は result の bytes を key ごとに保存する
///
/// # 契約
/// - `get` は即時に返す（待たない）
/// - `Ok(None)` は「まだ result がない」、`Ok(Some(_))` は「ある」
/// - `put` 後、`ttl` 以内の `get` はその値を返す
/// - `ttl` 経過後の破棄タイミングは実装に任せる
#[async_trait]
pub trait StorageDriver: Send + Sync {
    async fn get(&self, key: &MessageKey) -> Result<Option<Vec<u8>>, DriverError>;

    async fn put(
        &self,
        key: &MessageKey,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), DriverError>;
}
