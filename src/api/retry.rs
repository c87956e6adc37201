use crate::error::ApiError;
use anyhow::Result;
use std::thread::sleep;
use std::time::Duration;
use tracing::{error, warn};

/// How many times, and how patiently, a backend read is repeated.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts on top of the first one
    pub max_retries: u32,
    /// Wait before the first retry; doubled for each one after
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(2_u32.saturating_pow(retry))
    }

    /// Run `operation`, repeating it only while it fails with a transient
    /// [`ApiError`]. Anything else is returned on the first failure.
    pub fn run<T, F>(&self, resource: &str, operation: F) -> Result<T>
    where
        F: Fn() -> Result<T>,
    {
        let mut retry = 0;
        loop {
            let err = match operation() {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !is_transient(&err) {
                return Err(err);
            }
            if retry >= self.max_retries {
                error!(resource, attempts = retry + 1, "giving up on backend call");
                return Err(err);
            }

            let delay = self.delay_for(retry);
            warn!(
                resource,
                retry = retry + 1,
                max_retries = self.max_retries,
                delay_ms = delay.as_millis() as u64,
                "backend call failed: {:#}. Retrying",
                err
            );
            sleep(delay);
            retry += 1;
        }
    }
}

/// True when the failure came from the API client and may clear up by itself.
pub fn is_transient(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ApiError>().is_some_and(ApiError::is_transient)
}
