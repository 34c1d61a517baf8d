//! Bounded retry for flaky remote fetches
//!
//! The site sometimes answers with an empty page instead of an error, so an
//! empty collection counts as a failed attempt just like an `Err` does.
//! Attempts are fixed in number and evenly spaced; there is no backoff.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total number of attempts, the first one included
    pub max_attempts: u32,

    /// Fixed pause between two attempts in milliseconds
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 0,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given number of attempts and no delay
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Set the pause between attempts
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Run `operation` until it yields a non-empty collection
///
/// Exactly `policy.max_attempts` attempts are made at most. Both an `Err`
/// and an empty `Vec` count as a failure. After the last failed attempt the
/// result is an empty `Vec`; callers decide whether that is fatal.
///
/// # Example
///
/// ```no_run
/// use cleaning_schedule::utils::retry::{fetch_with_retry, RetryPolicy};
///
/// # async fn demo() {
/// let policy = RetryPolicy::new(3);
/// let names: Vec<String> = fetch_with_retry(&policy, "students", || async {
///     Ok::<_, std::io::Error>(vec!["Alice".to_string()])
/// })
/// .await;
/// assert_eq!(names.len(), 1);
/// # }
/// ```
pub async fn fetch_with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    what: &str,
    mut operation: F,
) -> Vec<T>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    for attempt in 1..=policy.max_attempts {
        if attempt > 1 {
            info!(
                attempt = attempt,
                max_attempts = policy.max_attempts,
                "Trying again to get {what}"
            );
            if policy.delay_ms > 0 {
                tokio::time::sleep(policy.delay()).await;
            }
        } else {
            info!("Trying to get {what}");
        }

        match operation().await {
            Ok(items) if !items.is_empty() => {
                debug!(attempt = attempt, count = items.len(), "Received {what}");
                return items;
            }
            Ok(_) => {
                warn!(attempt = attempt, "Did not receive any {what}");
            }
            Err(e) => {
                warn!(attempt = attempt, error = %e, "Failed to get {what}");
            }
        }
    }

    error!(
        max_attempts = policy.max_attempts,
        "Max retries reached while getting {what}, giving up"
    );
    Vec::new()
}
