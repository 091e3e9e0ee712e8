use backoff::{future::retry, ExponentialBackoff};
use std::future::Future;
use std::time::Duration;

use crate::error::AppError;

/// Whether an error is transient and worth another attempt.
///
/// Rate limits, timeouts and provider 5xx are retried; auth failures and
/// malformed requests fail immediately.
fn is_retryable_error(error: &AppError) -> bool {
    match error {
        AppError::OpenAiRateLimitError | AppError::OpenAiTemporaryError => true,
        AppError::OpenAiError(msg) => {
            let msg_lower = msg.to_lowercase();
            msg_lower.contains("rate limit")
                || msg_lower.contains("timeout")
                || msg_lower.contains("timed out")
                || msg_lower.contains("429")
                || msg_lower.contains("502")
                || msg_lower.contains("503")
                || msg_lower.contains("504")
                || msg_lower.contains("connection")
        }
        _ => false,
    }
}

fn create_backoff() -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: Duration::from_millis(500),
        max_interval: Duration::from_secs(10),
        max_elapsed_time: Some(Duration::from_secs(30)),
        multiplier: 2.0,
        ..Default::default()
    }
}

/// Run an async operation with exponential backoff on transient errors.
pub async fn with_retry<F, Fut, T>(operation: F) -> Result<T, AppError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    with_backoff(create_backoff(), operation).await
}

async fn with_backoff<F, Fut, T>(backoff: ExponentialBackoff, operation: F) -> Result<T, AppError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    retry(backoff, || async {
        match operation().await {
            Ok(result) => Ok(result),
            Err(e) if is_retryable_error(&e) => {
                tracing::warn!(error = %e, "Retryable error, will retry");
                Err(backoff::Error::transient(e))
            }
            Err(e) => Err(backoff::Error::permanent(e)),
        }
    })
    .await
}
