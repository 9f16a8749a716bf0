//! Retry helper for transient provider failures.

use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Run `operation`, retrying once per entry in `delays` after each failure.
///
/// The delay slice doubles as the retry budget: `delays.len()` retries in
/// total, sleeping the listed number of seconds before each one. Returns the
/// first success or the last error once the schedule is exhausted.
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, delays: &[u64]) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = delays.len() + 1;
    let mut schedule = delays.iter();

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => match schedule.next() {
                Some(delay_secs) => {
                    let attempt = attempts - schedule.len() - 1;
                    warn!(
                        "Request failed (attempt {attempt}/{attempts}): {e}. Retrying after {delay_secs}s..."
                    );
                    sleep(Duration::from_secs(*delay_secs)).await;
                }
                None => return Err(e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn first_success_returns_immediately() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), String>(())
                }
            },
            &[1, 1],
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_within_the_schedule() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result: Result<(), String> = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    if attempts.fetch_add(1, Ordering::SeqCst) + 1 < 3 {
                        Err("fail".to_string())
                    } else {
                        Ok(())
                    }
                }
            },
            &[1, 1, 1],
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_schedule_yields_last_error() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result: Result<(), String> = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(format!("fail {}", attempts.load(Ordering::SeqCst)))
                }
            },
            &[1, 1],
        )
        .await;

        assert_eq!(result.unwrap_err(), "fail 3");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }
}
