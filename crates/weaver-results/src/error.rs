use thiserror::Error;

use crate::ports::DriverError;

/// Failure of a ResultStore operation.
///
/// "No result yet" is never an error; it is `Ok(None)`.
#[derive(Debug, Error)]
pub enum ResultError {
    #[error("storage driver failed: {0}")]
    Driver(#[from] DriverError),

    #[error("failed to encode result: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode result: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("wait for result was cancelled")]
    Cancelled,
}
