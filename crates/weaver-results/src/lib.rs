//! weaver-results
//!
//! Result storage for the Weaver task pipeline: a producer stores the
//! outcome of a message under a key derived from the message identity, and
//! callers fetch it later, optionally waiting with backoff up to a deadline.
//!
//! # モジュール構成
//! - **domain**: Message, MessageId, MessageKey, queue 名の正規化
//! - **ports**: StorageDriver, BackoffPolicy
//! - **impls**: InMemoryDriver, ExponentialBackoff
//! - **app**: ResultStore, ResultStoreBuilder, ResultStoreConfig
//! - **error**: ResultError

pub mod app;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;

pub use app::{GetOptions, ResultStore, ResultStoreBuilder, ResultStoreConfig};
pub use domain::{Message, MessageId, MessageKey};
pub use error::ResultError;
pub use impls::{ExponentialBackoff, InMemoryDriver};
pub use ports::{BackoffPolicy, DriverError, StorageDriver};
