//! linkrpc-core — foundation traits and types for LinkRPC.
//!
//! # Overview
//!
//! LinkRPC is the client side of a point-to-point message link. The core
//! crate defines:
//!
//! - [`RpcTransport`] — the async seam every transport implements
//! - [`CallOutcome`] / [`Response`] — the result of one call attempt
//! - [`TransportError`] — structured error type returned by [`Channel`]
//! - [`policy`] module — retry decisions taken after each attempt
//! - [`auth`] module — shared-credential authentication and the process-wide
//!   default authenticator
//! - [`Channel`] — the attempt loop tying transport, policy and credential
//!   together

pub mod auth;
pub mod channel;
pub mod codes;
pub mod error;
pub mod policy;
pub mod request;
pub mod response;
pub mod transport;

pub use auth::{
    default_authenticator, set_default_authenticator, set_default_authenticator_arc, Authenticator,
    Credential, SimpleAuthenticator, VerifyResult,
};
pub use channel::{Channel, ChannelConfig};
pub use error::TransportError;
pub use policy::{DefaultRetryPolicy, LogicalRetryPolicy, RetryConfig, RetryDecision, RetryPolicy};
pub use request::{CallRequest, MuxPushRequest, Request};
pub use response::{CallOutcome, ErrorCode, MuxPushResponse, Response};
pub use transport::RpcTransport;
