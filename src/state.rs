use std::sync::Arc;

use crate::auth::AuthKeys;
use crate::store::{MemoryStore, PgStore, Store};

/// Shared application state: the storage engine and the token keys.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub keys: AuthKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, keys: AuthKeys) -> Self {
        Self { store, keys }
    }

    pub fn postgres(store: PgStore, keys: AuthKeys) -> Self {
        Self::new(Arc::new(store), keys)
    }

    pub fn in_memory(keys: AuthKeys) -> Self {
        Self::new(Arc::new(MemoryStore::new()), keys)
    }
}
