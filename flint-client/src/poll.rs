//! Bounded polling primitive
//!
//! Generic retry loop shared by run correlation (waiting for a queued run
//! to become visible) and completion polling (waiting for a run to reach
//! a terminal status). Attempt accounting lives in the loop itself rather
//! than in any shared state, and there is no wall-clock bound beyond
//! `max_attempts * interval` — callers size the policy to their budget.

use std::future::Future;

use tracing::debug;

use crate::error::ClientError;

/// Retry budget for one polling loop
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// Pause between attempts
    pub interval: std::time::Duration,
    /// Attempt limit; 0 polls until a value is acceptable
    pub max_attempts: u32,
}

impl PollPolicy {
    pub const fn new(interval: std::time::Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

/// Why a polling loop stopped without an acceptable value
#[derive(Debug)]
pub enum PollError<T> {
    /// The attempt budget ran out; carries the last fetched value so the
    /// caller can report the state it last saw
    Exhausted { last: T, attempts: u32 },
    /// A fetch failed; polling never papers over transport errors
    Client(ClientError),
}

/// Repeatedly fetch until a value satisfies `is_acceptable`
///
/// Attempts are strictly sequential: each fetch completes before the next
/// is scheduled, with a cooperative sleep in between. A bounded policy
/// stops at exactly `max_attempts` fetches and fails with
/// [`PollError::Exhausted`]; exhaustion is an error here, and callers
/// that want the best-effort last value unpack it from the error.
pub async fn poll<T, F, Fut>(
    mut fetch: F,
    is_acceptable: impl Fn(&T) -> bool,
    policy: PollPolicy,
) -> Result<T, PollError<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = crate::error::Result<T>>,
{
    let mut attempts: u32 = 0;

    loop {
        let value = fetch().await.map_err(PollError::Client)?;
        attempts += 1;

        if is_acceptable(&value) {
            debug!(attempts, "poll accepted a value");
            return Ok(value);
        }

        if policy.max_attempts != 0 && attempts >= policy.max_attempts {
            debug!(attempts, "poll attempt budget exhausted");
            return Err(PollError::Exhausted {
                last: value,
                attempts,
            });
        }

        tokio::time::sleep(policy.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Duration;

    /// Fetch stub that returns the 1-based attempt number
    fn counting_fetch(
        calls: &Cell<u32>,
    ) -> impl FnMut() -> std::future::Ready<crate::error::Result<u32>> + '_ {
        move || {
            let n = calls.get() + 1;
            calls.set(n);
            std::future::ready(Ok(n))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolves_at_acceptable_attempt() {
        let calls = Cell::new(0u32);
        let start = tokio::time::Instant::now();

        let result = poll(
            counting_fetch(&calls),
            |n| *n == 3,
            PollPolicy::new(Duration::from_millis(100), 10),
        )
        .await;

        assert!(matches!(result, Ok(3)));
        assert_eq!(calls.get(), 3, "no fetches after acceptance");
        // Two sleeps between three attempts.
        assert_eq!(start.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_needs_no_sleep() {
        let calls = Cell::new(0u32);
        let start = tokio::time::Instant::now();

        let result = poll(
            counting_fetch(&calls),
            |n| *n == 1,
            PollPolicy::new(Duration::from_secs(5), 10),
        )
        .await;

        assert!(matches!(result, Ok(1)));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_at_exactly_max_attempts() {
        let calls = Cell::new(0u32);

        let result = poll(
            counting_fetch(&calls),
            |_| false,
            PollPolicy::new(Duration::from_millis(10), 4),
        )
        .await;

        match result {
            Err(PollError::Exhausted { last, attempts }) => {
                assert_eq!(attempts, 4);
                assert_eq!(last, 4, "carries the last fetched value");
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
        assert_eq!(calls.get(), 4, "never schedules attempt max_attempts + 1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_max_attempts_is_unbounded() {
        let calls = Cell::new(0u32);

        let result = poll(
            counting_fetch(&calls),
            |n| *n == 25,
            PollPolicy::new(Duration::from_millis(10), 0),
        )
        .await;

        assert!(matches!(result, Ok(25)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_error_propagates_immediately() {
        let calls = Cell::new(0u32);

        let result = poll(
            || {
                let n = calls.get() + 1;
                calls.set(n);
                std::future::ready(if n < 2 {
                    Ok(n)
                } else {
                    Err(ClientError::ParseError("boom".to_string()))
                })
            },
            |_| false,
            PollPolicy::new(Duration::from_millis(10), 10),
        )
        .await;

        assert!(matches!(result, Err(PollError::Client(_))));
        assert_eq!(calls.get(), 2, "stops at the failing fetch");
    }
}
