//! Retry policies — consulted by the channel after each call attempt.
//!
//! ```text
//! attempt → CallOutcome ─┬─ transport failure ──→ [DefaultRetryPolicy]
//!                        └─ response delivered ─→ [LogicalRetryPolicy]
//! ```

pub mod logical;
pub mod retry;

pub use logical::{LogicalRetryPolicy, RetryConfig};
pub use retry::{DefaultRetryPolicy, RetryDecision, RetryPolicy};
