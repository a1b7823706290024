//! Event Inbox
//!
//! External systems push named events with a JSON payload; a consumer polls
//! the inbox for pending events and acknowledges them once processed.
//!
//! # Features
//!
//! - **Lifecycle**: `pending` → `acknowledged`, once, never back
//! - **Inbox listing**: filter by status, newest first, bounded limit
//! - **Durable store**: append-only JSONL log, replayed and compacted on open
//! - **REST API**: axum router under `/api/v1`
//!
//! # Modules
//!
//! - `types`: Event, EventId, EventStatus
//! - `event_store`: storage trait plus memory and file backends
//! - `lifecycle`: ingest / acknowledge / get with validation
//! - `inbox`: status-filtered listing
//! - `api`: HTTP router and handlers
//! - `config`: environment-driven settings
//! - `utils`: timestamps and atomic file rewrites
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use event_inbox::{EventStatus, InboxQuery, LifecycleService, MemoryEventStore};
//!
//! let store = Arc::new(MemoryEventStore::new());
//! let service = LifecycleService::new(store.clone());
//! let inbox = InboxQuery::new(store);
//!
//! let ingested = service
//!     .ingest("stripe", "payment.succeeded", serde_json::json!({"amount": 100}))
//!     .unwrap();
//! let page = inbox.query(EventStatus::Pending, 50).unwrap();
//! assert_eq!(page.events[0].id, ingested.event.id);
//! service.acknowledge(&ingested.event.id).unwrap();
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod event_store;
pub mod inbox;
pub mod lifecycle;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{Config, StorageKind};
pub use error::{InboxError, InboxResult};
pub use event_store::{EventStore, EventStoreConfig, FileEventStore, MemoryEventStore};
pub use inbox::{InboxPage, InboxQuery};
pub use lifecycle::{Acknowledgement, Ingested, LifecycleService};
pub use types::{Event, EventId, EventStatus, Payload};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
