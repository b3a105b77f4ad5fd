//! The retry decision contract and the transport's default policy.

use std::time::Duration;

use async_trait::async_trait;

use crate::codes;
use crate::response::CallOutcome;

/// What to do after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    DoNotRetry,
}

impl RetryDecision {
    pub fn is_retry(self) -> bool {
        self == Self::Retry
    }
}

impl std::fmt::Display for RetryDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Retry => write!(f, "retry"),
            Self::DoNotRetry => write!(f, "do-not-retry"),
        }
    }
}

/// Decides whether a completed attempt should be retried.
///
/// Called once per attempt while the channel still has retry budget. The
/// outcome is passed mutably so a policy can reset response state before
/// the next attempt. Any pause must suspend only the calling task.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn RetryPolicy>`.
#[async_trait]
pub trait RetryPolicy: Send + Sync + 'static {
    async fn decide(&self, outcome: &mut CallOutcome) -> RetryDecision;

    /// Upper bound of the pause `decide` may take before returning
    /// [`RetryDecision::Retry`]. Used only to sanity-check call timeouts.
    fn retry_delay(&self) -> Duration {
        Duration::ZERO
    }
}

/// Retries connection-level failures only.
///
/// Delivered responses, call deadline expiry (`ERPCTIMEDOUT`) and rejected
/// credentials (`ERPCAUTH`) are never retried: the request may already have
/// been processed, or the next attempt would fail the same way.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRetryPolicy;

impl DefaultRetryPolicy {
    pub fn is_retryable_code(code: i32) -> bool {
        matches!(
            code,
            codes::EFAILEDSOCKET
                | codes::EEOF
                | codes::EHOSTDOWN
                | codes::ELOGOFF
                | codes::ETIMEDOUT
                | codes::ELIMIT
                | codes::ENOENT
                | codes::EPIPE
                | codes::ECONNREFUSED
                | codes::ECONNRESET
                | codes::ENODATA
                | codes::EOVERCROWDED
                | codes::EH2RUNOUTSTREAMS
        )
    }
}

#[async_trait]
impl RetryPolicy for DefaultRetryPolicy {
    async fn decide(&self, outcome: &mut CallOutcome) -> RetryDecision {
        if Self::is_retryable_code(outcome.error_code()) {
            RetryDecision::Retry
        } else {
            RetryDecision::DoNotRetry
        }
    }
}
