use serde::{Deserialize, Serialize};
use std::env::VarError;
use std::error::Error;
use std::sync::Arc;
use tokio::time::{Duration, sleep};
use tracing::info;
use tracing_subscriber::EnvFilter;

use weaver_results::{
    GetOptions, InMemoryDriver, Message, ResultStore, ResultStoreConfig, StorageDriver,
};

const CONFIG_ENV: &str = "WEAVER_RESULTS_CONFIG";

#[derive(Debug, Serialize, Deserialize)]
struct AddPayload {
    a: i64,
    b: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct AddResult {
    sum: i64,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// `WEAVER_RESULTS_CONFIG` が指すファイルから設定を読む（未設定ならデフォルト）
fn load_config() -> Result<ResultStoreConfig, Box<dyn Error>> {
    config_from_env(std::env::var(CONFIG_ENV))
}

fn config_from_env(var: Result<String, VarError>) -> Result<ResultStoreConfig, Box<dyn Error>> {
    match var {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)?;
            Ok(ResultStoreConfig::from_json_str(&raw)?)
        }
        Err(VarError::NotPresent) => Ok(ResultStoreConfig::default()),
        Err(e @ VarError::NotUnicode(_)) => Err(format!("{CONFIG_ENV}: {e}").into()),
    }
}

/// worker：少し時間をかけて計算し、result を保存する
async fn add_actor<D: StorageDriver + ?Sized>(
    store: Arc<ResultStore<D>>,
    message: Message,
    payload: AddPayload,
) {
    sleep(Duration::from_millis(300)).await;
    let result = AddResult {
        sum: payload.a + payload.b,
    };
    match store
        .store_result(&message, &result, Duration::from_secs(60))
        .await
    {
        Ok(()) => info!(message_id = %message.message_id(), "stored result"),
        Err(e) => tracing::error!(error = %e, "failed to store result"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    // (A) 設定と driver を用意（driver の所有者はこちら）
    let config = load_config()?;
    let driver = Arc::new(InMemoryDriver::new());
    let store = Arc::new(ResultStore::builder(driver.clone())
        .config(&config)?
        .build()?);
    info!(namespace = store.namespace(), "result store ready");

    // (B) メッセージを作って worker に渡す
    let message = Message::generate("default", "add");
    let key = store.build_message_key(&message);
    info!(message_id = %message.message_id(), %key, "enqueued message");

    let worker = tokio::spawn(add_actor(
        store.clone(),
        message.clone(),
        AddPayload { a: 40, b: 2 },
    ));

    // (C) まだ結果はない
    let early: Option<AddResult> = store
        .get_result(&message, GetOptions::non_blocking())
        .await?;
    println!("non-blocking get: {early:?}");

    // (D) 結果が出るまで待つ
    let result: Option<AddResult> = store
        .get_result(
            &message,
            GetOptions::blocking().with_timeout(Duration::from_secs(5)),
        )
        .await?;
    match result {
        Some(result) => println!("blocking get: sum={}", result.sum),
        None => println!("blocking get: timed out"),
    }

    worker.await?;
    println!("stored entries: {}", driver.len().await);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn unset_variable_uses_defaults() {
        let config = config_from_env(Err(VarError::NotPresent)).unwrap();
        assert_eq!(config, ResultStoreConfig::default());
    }

    #[test]
    fn non_unicode_variable_is_an_error() {
        let err = config_from_env(Err(VarError::NotUnicode(OsString::from("bad")))).unwrap_err();
        assert!(err.to_string().contains(CONFIG_ENV));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let result = config_from_env(Ok("/nonexistent/weaver-results.json".to_string()));
        assert!(result.is_err());
    }
}
