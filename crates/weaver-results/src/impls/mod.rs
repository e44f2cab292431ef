//! Impls - port の実装
//!
//! # 含まれる実装
//! - **InMemoryDriver**: 開発用・テスト用の StorageDriver
//! - **ExponentialBackoff**: デフォルトの BackoffPolicy
//!
//! # 本番用実装
//! Redis / Memcached などの driver は別クレートに配置します。

pub mod backoff;
pub mod memory_driver;

pub use self::backoff::ExponentialBackoff;
pub use self::memory_driver::InMemoryDriver;
