//! Bounded retry for asynchronous confirmation waits.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// All attempts exhausted without the operation producing a value.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("operation did not complete within {attempts} attempts")]
pub struct RetryTimeout {
    pub attempts: u32,
}

/// Run `op` up to `max_attempts` times, sleeping `interval` before each
/// attempt, until it yields `Some`. The sleep comes first: this models
/// "wait for confirmation, then recheck", the shape of polling a chain
/// for state that a just-sent transaction will materialize.
pub async fn retry_until_some<T, F, Fut>(
    max_attempts: u32,
    interval: Duration,
    mut op: F,
) -> Result<T, RetryTimeout>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for _ in 0..max_attempts {
        tokio::time::sleep(interval).await;
        if let Some(value) = op().await {
            return Ok(value);
        }
    }
    Err(RetryTimeout {
        attempts: max_attempts,
    })
}
