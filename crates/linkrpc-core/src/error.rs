//! Call-level error types.

use thiserror::Error;

use crate::codes;

/// Errors a [`Channel`](crate::Channel) call can end with.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The last attempt failed below the application layer.
    #[error("call failed with {name} ({code}): {text}", name = codes::describe(*code))]
    Call { code: i32, text: String },

    /// The overall call deadline expired, retries included.
    #[error("call timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The transport reported success but carried no response.
    #[error("transport returned no response")]
    EmptyResponse,

    /// The response belongs to a different method than the one called.
    #[error("unexpected response for method {method}")]
    UnexpectedResponse { method: String },
}

impl TransportError {
    /// Returns `true` if a fresh call might succeed where this one failed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Call { code, .. } => !matches!(
                *code,
                codes::ERPCAUTH | codes::ENOMETHOD | codes::ENOSERVICE | codes::EREQUEST
            ),
            Self::Timeout { .. } => true,
            Self::EmptyResponse | Self::UnexpectedResponse { .. } => false,
        }
    }

    /// The transport code behind this error, if it came from an attempt.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Call { code, .. } => Some(*code),
            Self::Timeout { .. } => Some(codes::ERPCTIMEDOUT),
            _ => None,
        }
    }
}
