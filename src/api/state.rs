//! Shared application state for HTTP handlers

use std::sync::Arc;

use crate::event_store::EventStore;
use crate::inbox::InboxQuery;
use crate::lifecycle::LifecycleService;

/// Everything a request handler needs, built once at startup
pub struct AppState {
    pub lifecycle: LifecycleService,
    pub inbox: InboxQuery,
}

impl AppState {
    /// Create the state around an opened event store
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            lifecycle: LifecycleService::new(store.clone()),
            inbox: InboxQuery::new(store),
        }
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        self.lifecycle.store()
    }
}
