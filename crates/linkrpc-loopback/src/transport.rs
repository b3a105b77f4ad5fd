//! Client side of a loopback link.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use linkrpc_core::codes;
use linkrpc_core::{CallOutcome, CallRequest, RpcTransport};

use crate::server::LoopbackServer;

/// Delivers calls to an in-process [`LoopbackServer`].
pub struct LoopbackTransport {
    name: String,
    server: Arc<LoopbackServer>,
    peer: SocketAddr,
    faults: Mutex<VecDeque<i32>>,
    latency: Duration,
    attempts: AtomicUsize,
}

impl LoopbackTransport {
    /// `peer` is the address the server sees for this client.
    pub fn new(server: Arc<LoopbackServer>, peer: SocketAddr) -> Self {
        Self {
            name: format!("loopback://{peer}"),
            server,
            peer,
            faults: Mutex::new(VecDeque::new()),
            latency: Duration::ZERO,
            attempts: AtomicUsize::new(0),
        }
    }

    /// Fail the next sends with these transport codes, in order, before the
    /// server is reached.
    pub fn with_faults(self, faults: impl IntoIterator<Item = i32>) -> Self {
        *self.faults.lock().unwrap_or_else(PoisonError::into_inner) = faults.into_iter().collect();
        self
    }

    /// Simulated one-way delay added to every send.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Sends made so far, injected faults included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn next_fault(&self) -> Option<i32> {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

#[async_trait]
impl RpcTransport for LoopbackTransport {
    async fn send(&self, req: &CallRequest) -> CallOutcome {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(code) = self.next_fault().filter(|code| *code != codes::OK) {
            tracing::debug!(peer = %self.peer, code = codes::describe(code), "injected fault");
            return CallOutcome::failed(code, format!("injected {}", codes::describe(code)));
        }
        self.server.serve(req, self.peer).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
