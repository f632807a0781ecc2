//! Optional process-wide client slot.
//!
//! The library never reads this slot itself; applications that want a single
//! client install one at startup and fetch it where needed.

use std::sync::{Arc, PoisonError, RwLock};

use crate::client::AriregisterClient;

static SHARED: RwLock<Option<Arc<AriregisterClient>>> = RwLock::new(None);

/// Store `client` as the shared instance, replacing any previous one.
pub fn install(client: AriregisterClient) -> Arc<AriregisterClient> {
    let client = Arc::new(client);
    *SHARED.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&client));
    client
}

/// The shared instance, if one was installed.
pub fn get() -> Option<Arc<AriregisterClient>> {
    SHARED
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Drop the shared instance. Clients already handed out stay usable.
pub fn reset() -> Option<Arc<AriregisterClient>> {
    SHARED.write().unwrap_or_else(PoisonError::into_inner).take()
}
