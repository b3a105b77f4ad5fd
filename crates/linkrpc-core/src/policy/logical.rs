//! Application-aware retry policy for `MuxPush` calls.
//!
//! A delivered response whose status says "unexpected error" is retried after
//! a fixed pause. Every other delivered status is final: deterministic
//! failures such as `INVALID_REQUEST` would come back identical on retry.
//! Transport failures are handed to a fallback policy untouched.
//!
//! Keep the channel timeout above `max_retry * retry_delay`. The caller gets
//! control back at the timeout even while a retry is still pending.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::channel::millis;
use crate::policy::retry::{DefaultRetryPolicy, RetryDecision, RetryPolicy};
use crate::response::{CallOutcome, ErrorCode, Response};

/// Configuration for [`LogicalRetryPolicy`].
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Pause before signalling a retry of a retryable response. Zero means
    /// no pause.
    pub retry_delay: Duration,
    /// Application codes that count as transient.
    pub retryable_codes: Vec<ErrorCode>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retry_delay: Duration::from_secs(1),
            retryable_codes: vec![ErrorCode::UnexpectedError],
        }
    }
}

/// Retry decider for `MuxPush` calls. Holds only immutable state and is
/// safe to share across tasks.
#[derive(Clone)]
pub struct LogicalRetryPolicy {
    config: RetryConfig,
    fallback: Arc<dyn RetryPolicy>,
}

impl LogicalRetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            fallback: Arc::new(DefaultRetryPolicy),
        }
    }

    /// Default retryable codes with the given pause.
    pub fn with_delay(retry_delay: Duration) -> Self {
        Self::new(RetryConfig {
            retry_delay,
            ..Default::default()
        })
    }

    /// Replace the policy consulted for transport-level failures.
    pub fn with_fallback(mut self, fallback: Arc<dyn RetryPolicy>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

impl Default for LogicalRetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl std::fmt::Debug for LogicalRetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogicalRetryPolicy")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RetryPolicy for LogicalRetryPolicy {
    async fn decide(&self, outcome: &mut CallOutcome) -> RetryDecision {
        if outcome.is_transport_failure() {
            return self.fallback.decide(outcome).await;
        }

        let method = outcome.response().map(|r| r.method().to_string());
        let Some(response) = outcome.response_mut().and_then(Response::as_mux_push_mut) else {
            tracing::warn!(
                method = method.as_deref().unwrap_or("<none>"),
                "response is not a MuxPush response, not retrying"
            );
            return RetryDecision::DoNotRetry;
        };

        if !self.config.retryable_codes.contains(&response.error_code) {
            return RetryDecision::DoNotRetry;
        }

        tracing::debug!(
            code = %response.error_code,
            error_msg = %response.error_msg,
            delay_ms = millis(self.config.retry_delay),
            "response failed for unknown reasons, retrying after delay"
        );
        response.clear();
        if !self.config.retry_delay.is_zero() {
            tokio::time::sleep(self.config.retry_delay).await;
        }
        RetryDecision::Retry
    }

    fn retry_delay(&self) -> Duration {
        self.config.retry_delay
    }
}
