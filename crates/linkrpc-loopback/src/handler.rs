//! Server-side message handlers.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use linkrpc_core::{ErrorCode, MuxPushRequest, MuxPushResponse};

/// Receives pushed messages.
#[async_trait]
pub trait MuxHandler: Send + Sync + 'static {
    async fn push(&self, req: MuxPushRequest) -> MuxPushResponse;
}

/// Answers from a fixed script of status codes, then `SUCCESS` forever.
///
/// Useful for simulating a receiver that fails a few times before
/// recovering.
#[derive(Debug, Default)]
pub struct ScriptedHandler {
    script: Mutex<VecDeque<ErrorCode>>,
    calls: AtomicUsize,
}

impl ScriptedHandler {
    pub fn new(script: impl IntoIterator<Item = ErrorCode>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// `failures` copies of `code`, then success.
    pub fn failing(code: ErrorCode, failures: usize) -> Self {
        Self::new(std::iter::repeat(code).take(failures))
    }

    /// Number of pushes handled so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_code(&self) -> ErrorCode {
        let mut script = match self.script.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        script.pop_front().unwrap_or(ErrorCode::Success)
    }
}

#[async_trait]
impl MuxHandler for ScriptedHandler {
    async fn push(&self, req: MuxPushRequest) -> MuxPushResponse {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let code = self.next_code();
        tracing::debug!(call, link_id = %req.link_id, key = %req.key, %code, "push handled");
        match code {
            ErrorCode::Success => MuxPushResponse::success(),
            other => MuxPushResponse::error(other, format!("scripted failure on call {call}")),
        }
    }
}
