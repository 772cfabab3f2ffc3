//! Fixed-interval polling until a terminal state

use crate::error::{CloudError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Interval between droplet status checks while waiting for `active`
pub const DROPLET_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Interval between action status checks
pub const ACTION_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Polling configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay before each status fetch
    pub interval: Duration,

    /// Maximum number of fetches; `None` polls until the terminal state
    pub max_attempts: Option<u32>,
}

impl PollConfig {
    pub fn new(interval: Duration, max_attempts: Option<u32>) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    pub fn droplet() -> Self {
        Self::new(DROPLET_POLL_INTERVAL, None)
    }

    pub fn action() -> Self {
        Self::new(ACTION_POLL_INTERVAL, None)
    }
}

/// Poll `fetch` until `is_done` holds
///
/// `initial` is the state already known to the caller (usually the response
/// of the request that started the operation). If it is terminal nothing is
/// fetched. Otherwise each round sleeps `config.interval` and fetches again.
/// Errors from `fetch` end the loop immediately.
pub async fn poll_until<T, F, Fut, P>(
    config: &PollConfig,
    what: &str,
    initial: T,
    mut fetch: F,
    is_done: P,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: Fn(&T) -> bool,
{
    let mut current = initial;
    let mut attempts: u32 = 0;

    loop {
        if is_done(&current) {
            tracing::debug!(what, attempts, "Reached terminal state");
            return Ok(current);
        }

        if let Some(max) = config.max_attempts {
            if attempts >= max {
                return Err(CloudError::Timeout(format!(
                    "{} did not finish after {} checks",
                    what, attempts
                )));
            }
        }

        sleep(config.interval).await;
        current = fetch().await?;
        attempts += 1;
        tracing::debug!(what, attempts, "Polled status");
    }
}
