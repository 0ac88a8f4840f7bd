//! Retry policy for transient-overload failures.

use std::time::Duration;

/// How the relay retries a turn that fails with the overload signal.
///
/// The default matches the intended behavior of one retry after a fixed
/// one-second pause. Retries only apply before any output has streamed;
/// a turn that already produced partial text is never resent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first, overload failures only.
    pub max_retries: usize,
    /// Fixed pause before each retry.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            delay: Duration::from_secs(1),
        }
    }
}
