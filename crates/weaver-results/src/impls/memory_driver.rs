//! InMemoryDriver - 開発用・テスト用の StorageDriver
//!
//! # 実装詳細
//! - `HashMap<MessageKey, Entry>` を tokio の Mutex で保護
//! - TTL は put 時に `expires_at`（monotonic）として記録
//! - 期限切れの entry は get 時に遅延削除（purge_expired で一括削除も可能）

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::domain::MessageKey;
use crate::ports::{DriverError, StorageDriver};

struct Entry {
    value: Vec<u8>,
    /// `None` means the TTL overflowed the clock: never expires.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// In-process result storage with TTL support.
#[derive(Default)]
pub struct InMemoryDriver {
    entries: Mutex<HashMap<MessageKey, Entry>>,
}

impl InMemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Number of stored entries, expired ones included until purged.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl StorageDriver for InMemoryDriver {
    async fn get(&self, key: &MessageKey) -> Result<Option<Vec<u8>>, DriverError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        let expired = match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn put(
        &self,
        key: &MessageKey,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), DriverError> {
        let expires_at = Instant::now().checked_add(ttl);
        let mut entries = self.entries.lock().await;
        entries.insert(key.clone(), Entry { value, expires_at });
        Ok(())
    }
}
