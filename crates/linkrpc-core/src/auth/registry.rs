//! Process-wide default authenticator.
//!
//! Connection-accept paths deep inside a transport often have no handle to
//! application configuration. They fall back to the authenticator installed
//! here. Prefer passing one explicitly (`Channel::with_authenticator`,
//! server builders) where the call site allows it.
//!
//! # Usage contract
//! Install once during startup, before any channel or server that
//! authenticates is built. The slot is lock-protected so a later
//! replacement is memory-safe, but it is not coordinated with traffic in
//! flight: channels keep the credential they generated at construction, and
//! readers holding the previous `Arc` keep using it until they drop it.

use std::sync::{Arc, PoisonError, RwLock};

use crate::auth::simple::Authenticator;

static DEFAULT_AUTHENTICATOR: RwLock<Option<Arc<dyn Authenticator>>> = RwLock::new(None);

/// Install `auth` as the process-wide default, replacing and releasing the
/// previous one.
pub fn set_default_authenticator(auth: impl Authenticator) {
    install(Arc::new(auth));
}

/// Like [`set_default_authenticator`] for an authenticator that is already
/// shared.
pub fn set_default_authenticator_arc(auth: Arc<dyn Authenticator>) {
    install(auth);
}

fn install(auth: Arc<dyn Authenticator>) {
    let previous = {
        let mut slot = DEFAULT_AUTHENTICATOR
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        slot.replace(auth)
    };
    // Dropped outside the lock.
    drop(previous);
    tracing::debug!("default authenticator installed");
}

/// The installed default, or `None` if nothing was ever installed.
pub fn default_authenticator() -> Option<Arc<dyn Authenticator>> {
    DEFAULT_AUTHENTICATOR
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
