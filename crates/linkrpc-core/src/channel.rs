//! The client channel — owns the attempt loop for each logical call.
//!
//! Every attempt goes through the transport once. While retry budget remains
//! the outcome is handed to the retry policy, which may pause the calling
//! task before asking for another attempt. The whole call, pauses included,
//! is bounded by [`ChannelConfig::timeout`].

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{default_authenticator, Authenticator, Credential};
use crate::error::TransportError;
use crate::policy::{DefaultRetryPolicy, RetryPolicy};
use crate::request::{CallRequest, MuxPushRequest, Request};
use crate::response::{CallOutcome, MuxPushResponse, Response};
use crate::transport::RpcTransport;

/// Configuration for [`Channel`].
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Deadline for one logical call, retries included.
    pub timeout: Duration,
    /// Maximum number of retries (not counting the first attempt).
    pub max_retry: u32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            max_retry: 3,
        }
    }
}

impl ChannelConfig {
    /// `true` if a caller can time out while retries paused by
    /// `retry_delay` are still pending, i.e. `timeout <= max_retry * retry_delay`.
    pub fn timeout_undercuts_retries(&self, retry_delay: Duration) -> bool {
        let worst_case = retry_delay.saturating_mul(self.max_retry);
        !worst_case.is_zero() && self.timeout <= worst_case
    }
}

/// Whole milliseconds of `d`, saturating at `u64::MAX`.
pub(crate) fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// A client channel bound to one transport.
pub struct Channel {
    transport: Arc<dyn RpcTransport>,
    retry_policy: Arc<dyn RetryPolicy>,
    credential: Option<Credential>,
    config: ChannelConfig,
}

impl Channel {
    /// Create a channel using [`DefaultRetryPolicy`] and, if one is
    /// installed, the process-wide default authenticator.
    pub fn new(transport: Arc<dyn RpcTransport>, config: ChannelConfig) -> Self {
        let credential = default_authenticator().map(|auth| auth.generate_credential());
        Self {
            transport,
            retry_policy: Arc::new(DefaultRetryPolicy),
            credential,
            config,
        }
    }

    /// Install the policy consulted after each attempt.
    pub fn with_retry_policy(mut self, policy: Arc<dyn RetryPolicy>) -> Self {
        if self.config.timeout_undercuts_retries(policy.retry_delay()) {
            tracing::warn!(
                transport = self.transport.name(),
                timeout_ms = millis(self.config.timeout),
                retry_delay_ms = millis(policy.retry_delay()),
                max_retry = self.config.max_retry,
                "call timeout does not cover max_retry * retry_delay; \
                 callers may time out while retries are still pending"
            );
        }
        self.retry_policy = policy;
        self
    }

    /// Attach credentials from `auth` instead of the process-wide default.
    pub fn with_authenticator(mut self, auth: &dyn Authenticator) -> Self {
        self.credential = Some(auth.generate_credential());
        self
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// `true` if calls carry a credential.
    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// Perform one logical call.
    pub async fn call(&self, body: impl Into<Request>) -> Result<Response, TransportError> {
        let req = CallRequest::new(body, self.credential.clone());
        let timeout = self.config.timeout;
        let outcome = tokio::time::timeout(timeout, self.run_attempts(&req))
            .await
            .map_err(|_| {
                tracing::warn!(
                    transport = self.transport.name(),
                    method = req.body.method(),
                    timeout_ms = millis(timeout),
                    "call timed out"
                );
                TransportError::Timeout {
                    ms: millis(timeout),
                }
            })?;
        outcome.into_result()
    }

    /// Push one message and return the typed response.
    pub async fn push(&self, req: MuxPushRequest) -> Result<MuxPushResponse, TransportError> {
        match self.call(req).await? {
            Response::MuxPush(resp) => Ok(resp),
            other => Err(TransportError::UnexpectedResponse {
                method: other.method().to_string(),
            }),
        }
    }

    async fn run_attempts(&self, req: &CallRequest) -> CallOutcome {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let mut outcome = self.transport.send(req).await;

            // Budget spent: the last outcome stands as delivered.
            if attempt > self.config.max_retry {
                if attempt > 1 {
                    tracing::debug!(
                        attempt,
                        transport = self.transport.name(),
                        "retry budget exhausted"
                    );
                }
                return outcome;
            }

            let decision = self.retry_policy.decide(&mut outcome).await;
            if !decision.is_retry() {
                return outcome;
            }
            tracing::info!(
                attempt,
                code = outcome.error_code(),
                error = outcome.error_text(),
                transport = self.transport.name(),
                method = req.body.method(),
                "retrying call"
            );
        }
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("transport", &self.transport.name())
            .field("authenticated", &self.credential.is_some())
            .field("config", &self.config)
            .finish()
    }
}
