//! App - アプリケーション層
//!
//! ports を組み合わせて result store のロジックを実装します。
//!
//! # 主要コンポーネント
//! - **ResultStore**: key 導出、blocking get、TTL 付き store
//! - **ResultStoreBuilder**: 構築と起動時検証
//! - **ResultStoreConfig**: JSON で読める設定

pub mod builder;
pub mod config;
pub mod result_store;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, ResultStoreBuilder};
pub use self::config::{BackoffConfig, DEFAULT_TIMEOUT_MS, ResultStoreConfig};
pub use self::result_store::{GetOptions, ResultStore};
