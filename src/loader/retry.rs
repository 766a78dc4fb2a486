use std::future::Future;
use std::time::Duration;

use crate::error::LoadError;

/// Fixed-delay retry with a bounded number of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; at least 1 is always made.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt + 1` after attempt `attempt` (1-based)
    /// failed with `err`, or `None` to give up.
    pub fn next_delay(&self, attempt: u32, err: &LoadError) -> Option<Duration> {
        if attempt >= self.max_attempts.max(1) || !err.is_transient() {
            return None;
        }
        Some(self.delay)
    }

    /// Runs `op` until it succeeds or the policy gives up, awaiting `sleep`
    /// between attempts. Returns the last error on give-up.
    pub async fn run<T, Op, OpFut, Sleep, SleepFut>(&self, mut op: Op, mut sleep: Sleep) -> Result<T, LoadError>
    where
        Op: FnMut(u32) -> OpFut,
        OpFut: Future<Output = Result<T, LoadError>>,
        Sleep: FnMut(Duration) -> SleepFut,
        SleepFut: Future<Output = ()>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) => match self.next_delay(attempt, &err) {
                    Some(delay) => {
                        log::warn!("attempt {attempt}/{} failed: {err}", self.max_attempts);
                        sleep(delay).await;
                        attempt += 1;
                    }
                    None => return Err(err),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;

    fn transport_err() -> LoadError {
        LoadError::Transport {
            url: "components/header.html".into(),
            message: "offline".into(),
        }
    }

    #[test]
    fn succeeds_after_transient_failures() {
        let sleeps = RefCell::new(Vec::new());
        let policy = RetryPolicy::default();
        let out = block_on(policy.run(
            |attempt| async move {
                if attempt < 3 {
                    Err(transport_err())
                } else {
                    Ok(attempt)
                }
            },
            |d| {
                sleeps.borrow_mut().push(d);
                async {}
            },
        ));
        assert_eq!(out, Ok(3));
        assert_eq!(*sleeps.borrow(), vec![Duration::from_millis(500); 2]);
    }

    #[test]
    fn gives_up_at_max_attempts() {
        let calls = RefCell::new(0);
        let policy = RetryPolicy {
            max_attempts: 4,
            delay: Duration::ZERO,
        };
        let out: Result<(), _> = block_on(policy.run(
            |_| {
                *calls.borrow_mut() += 1;
                async { Err(transport_err()) }
            },
            |_| async {},
        ));
        assert_eq!(out, Err(transport_err()));
        assert_eq!(*calls.borrow(), 4);
    }

    #[test]
    fn not_found_is_not_retried() {
        let calls = RefCell::new(0);
        let missing = LoadError::Status {
            url: "components/nav.html".into(),
            status: 404,
        };
        let out: Result<(), _> = block_on(RetryPolicy::default().run(
            |_| {
                *calls.borrow_mut() += 1;
                let err = missing.clone();
                async move { Err(err) }
            },
            |_| async {},
        ));
        assert_eq!(out, Err(missing));
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            delay: Duration::ZERO,
        };
        assert_eq!(policy.next_delay(1, &transport_err()), None);
    }

    #[test]
    fn server_errors_are_transient() {
        let err = LoadError::Status {
            url: String::new(),
            status: 503,
        };
        assert_eq!(RetryPolicy::default().next_delay(1, &err), Some(Duration::from_millis(500)));
    }
}
