//! Message identifiers.
//!
//! # ID の扱い
//! - 自前で発行する ID は ULID（時刻でソート可能、分散生成可能）
//! - 外部の producer が発行した ID（UUID など）もそのまま受け入れる
//!
//! ResultStore は ID の形式を解釈しません。key 導出の入力として使うだけです。

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Identifier of a Message (one enqueued unit of work).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// 既存の ID をラップ（外部 producer 由来の ID 用）
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 新しい ULID ベースの ID を発行
    pub fn generate() -> Self {
        Self::from_ulid(Ulid::new())
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Ulid> for MessageId {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
