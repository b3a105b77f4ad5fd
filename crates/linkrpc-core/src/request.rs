//! Request types sent over a link.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::Credential;

/// Push one message into the receiver's mailbox for a link.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MuxPushRequest {
    /// Link the message belongs to.
    pub link_id: String,
    /// Rank of the sending party.
    pub sender_rank: u32,
    /// Mailbox key.
    pub key: String,
    /// Opaque message body.
    pub value: Vec<u8>,
}

impl MuxPushRequest {
    pub fn new(
        link_id: impl Into<String>,
        sender_rank: u32,
        key: impl Into<String>,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            link_id: link_id.into(),
            sender_rank,
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A request body, tagged by method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "body")]
pub enum Request {
    MuxPush(MuxPushRequest),
    /// Any other method, carried as untyped JSON.
    Raw { method: String, body: Value },
}

impl Request {
    /// Method name as seen on the wire.
    pub fn method(&self) -> &str {
        match self {
            Self::MuxPush(_) => "MuxPush",
            Self::Raw { method, .. } => method,
        }
    }
}

impl From<MuxPushRequest> for Request {
    fn from(req: MuxPushRequest) -> Self {
        Self::MuxPush(req)
    }
}

/// What a transport actually sends: the body plus the attached credential.
#[derive(Debug, Clone)]
pub struct CallRequest {
    pub body: Request,
    pub credential: Option<Credential>,
}

impl CallRequest {
    pub fn new(body: impl Into<Request>, credential: Option<Credential>) -> Self {
        Self {
            body: body.into(),
            credential,
        }
    }
}
