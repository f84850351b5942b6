use crate::utils::error::StoreError;
use std::future::Future;
use std::time::Duration;

/// Run a store call, failing with `StoreError::Timeout` once `limit` elapses.
/// Dropping the inner future cancels the call.
pub async fn with_deadline<T, F>(limit: Option<Duration>, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| StoreError::Timeout {
                seconds: limit.as_secs(),
            })?,
        None => call.await,
    }
}
