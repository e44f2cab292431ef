//! Ports - 抽象化レイヤー
//!
//! ResultStore が外部に要求するインターフェースを定義します。
//! 具体的な実装（Redis クライアント、バックオフ曲線など）は差し替え可能です。
//!
//! # 含まれる port
//! - **StorageDriver**: key → bytes の保存先（TTL 付き）
//! - **BackoffPolicy**: ポーリング間隔の計算

pub mod backoff;
pub mod storage_driver;

pub use self::backoff::BackoffPolicy;
pub use self::storage_driver::{DriverError, StorageDriver};
