//! Shared retry and timeout policies for outbound calls.

use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use log::warn;
use tokio::time::{sleep, timeout};

/// Cap on the backoff delay, so high attempt counts cannot stall the run.
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);
/// Default bound for external API calls; round fetches use a tighter one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Runs `operation` up to `max_attempts` times, sleeping 1s, 2s, 4s, ...
/// (capped at [`MAX_BACKOFF`]) between attempts.  Callers see only the final
/// success or the final failure.
pub async fn with_retry<T, F, Fut>(
    label: &str,
    max_attempts: u32,
    mut operation: F,
) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut delay = Duration::from_secs(1);
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                warn!(
                    "{label} failed, retrying in {}s (attempt {attempt}/{max_attempts}): {e:#}",
                    delay.as_secs()
                );
                sleep(delay).await;
                delay = (delay * 2).min(MAX_BACKOFF);
                attempt += 1;
            }
            Err(e) => {
                return Err(e.context(format!("{label}: exhausted all {max_attempts} attempts")))
            }
        }
    }
}

/// Bounds `future` to `limit`.  On timeout the future is dropped, which
/// aborts the underlying request rather than letting it run on.
pub async fn with_timeout<T, Fut>(limit: Duration, label: &str, future: Fut) -> anyhow::Result<T>
where
    Fut: Future<Output = anyhow::Result<T>>,
{
    timeout(limit, future)
        .await
        .with_context(|| format!("{label} timed out after {}s", limit.as_secs()))?
}
