//! Peer authentication with a shared credential.
//!
//! An [`Authenticator`] produces the credential a client attaches to its
//! calls and checks the credential a server receives. The process-wide
//! default in [`registry`] makes one authenticator reachable from code that
//! was not handed one explicitly.

pub mod registry;
pub mod simple;

pub use registry::{
    default_authenticator, set_default_authenticator, set_default_authenticator_arc,
};
pub use simple::{Authenticator, Credential, SimpleAuthenticator, VerifyResult};
