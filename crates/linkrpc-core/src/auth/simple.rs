//! The authenticator contract and the shared-secret implementation.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Opaque token shared out of band. Compared byte for byte; never printed.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential(<redacted, {} bytes>)", self.0.len())
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Result of checking a presented credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyResult {
    Accepted,
    Rejected,
}

impl VerifyResult {
    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}

impl std::fmt::Display for VerifyResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accepted => write!(f, "accepted"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Produces and checks peer credentials.
///
/// Invoked from connection setup on both sides, possibly from many tasks at
/// once. A mismatch is an ordinary [`VerifyResult::Rejected`], not an error.
pub trait Authenticator: Send + Sync + 'static {
    /// Credential to attach to outgoing calls.
    fn generate_credential(&self) -> Credential;

    /// Check a credential received from `peer`.
    fn verify_credential(&self, presented: &Credential, peer: SocketAddr) -> VerifyResult;
}

/// Accepts exactly one shared secret.
///
/// No challenge-response, expiry or per-peer policy: suitable for links
/// inside a trusted network only. The peer address is currently ignored.
#[derive(Debug, Clone)]
pub struct SimpleAuthenticator {
    credential: Credential,
}

impl SimpleAuthenticator {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            credential: Credential::new(secret),
        }
    }
}

impl Authenticator for SimpleAuthenticator {
    fn generate_credential(&self) -> Credential {
        self.credential.clone()
    }

    fn verify_credential(&self, presented: &Credential, _peer: SocketAddr) -> VerifyResult {
        if presented.as_bytes() == self.credential.as_bytes() {
            VerifyResult::Accepted
        } else {
            VerifyResult::Rejected
        }
    }
}
