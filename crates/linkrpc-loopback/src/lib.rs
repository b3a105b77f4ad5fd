//! linkrpc-loopback — in-process transport for LinkRPC.
//!
//! Calls never leave the process: [`LoopbackTransport`] hands each request
//! straight to a [`LoopbackServer`], which authenticates the caller and
//! dispatches to a [`MuxHandler`]. Transport faults can be injected to
//! exercise retry policies without a network.

pub mod handler;
pub mod server;
pub mod transport;

pub use handler::{MuxHandler, ScriptedHandler};
pub use server::LoopbackServer;
pub use transport::LoopbackTransport;
