//! The receiving end of a loopback link.

use std::net::SocketAddr;
use std::sync::Arc;

use linkrpc_core::codes;
use linkrpc_core::{
    default_authenticator, Authenticator, CallOutcome, CallRequest, Credential, Request,
};

use crate::handler::MuxHandler;

/// Authenticates callers and dispatches pushes to a handler.
pub struct LoopbackServer {
    handler: Arc<dyn MuxHandler>,
    authenticator: Option<Arc<dyn Authenticator>>,
}

impl LoopbackServer {
    pub fn new(handler: Arc<dyn MuxHandler>) -> Self {
        Self {
            handler,
            authenticator: None,
        }
    }

    /// Check callers with `auth` instead of the process-wide default.
    pub fn with_authenticator(mut self, auth: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(auth);
        self
    }

    /// Decide whether a caller at `peer` may proceed.
    ///
    /// With no authenticator configured and no process-wide default, every
    /// caller is accepted. Otherwise a missing or rejected credential fails
    /// with `ERPCAUTH`.
    pub fn accept(&self, credential: Option<&Credential>, peer: SocketAddr) -> Result<(), i32> {
        let Some(auth) = self.authenticator.clone().or_else(default_authenticator) else {
            return Ok(());
        };
        let Some(credential) = credential else {
            tracing::warn!(%peer, "caller presented no credential");
            return Err(codes::ERPCAUTH);
        };
        if auth.verify_credential(credential, peer).is_accepted() {
            Ok(())
        } else {
            tracing::warn!(%peer, "caller credential rejected");
            Err(codes::ERPCAUTH)
        }
    }

    /// Authenticate and serve one call.
    pub async fn serve(&self, req: &CallRequest, peer: SocketAddr) -> CallOutcome {
        if let Err(code) = self.accept(req.credential.as_ref(), peer) {
            return CallOutcome::failed(code, format!("authentication failed for {peer}"));
        }
        match &req.body {
            Request::MuxPush(push) => CallOutcome::delivered(self.handler.push(push.clone()).await),
            Request::Raw { method, .. } => {
                CallOutcome::failed(codes::ENOMETHOD, format!("no such method: {method}"))
            }
        }
    }
}

impl std::fmt::Debug for LoopbackServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopbackServer")
            .field("explicit_authenticator", &self.authenticator.is_some())
            .finish_non_exhaustive()
    }
}
