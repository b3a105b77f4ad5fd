//! The `RpcTransport` trait — the seam between a [`Channel`](crate::Channel)
//! and whatever actually moves bytes.

use async_trait::async_trait;

use crate::request::CallRequest;
use crate::response::CallOutcome;

/// Performs exactly one call attempt.
///
/// Transports never retry on their own; the channel owns the attempt loop.
/// Failures are reported through [`CallOutcome::failed`] rather than an
/// error so that the retry policy sees every attempt in the same shape.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` for use across Tokio tasks and are
/// stored as `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// Send one attempt and report how it went.
    async fn send(&self, req: &CallRequest) -> CallOutcome;

    /// Transport identifier for logs (address or name).
    fn name(&self) -> &str;
}
