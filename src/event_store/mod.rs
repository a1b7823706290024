//! Event Store Module
//!
//! Persistence for inbox events:
//! - `EventStore`: the storage trait the lifecycle service is built on
//! - `MemoryEventStore`: process-local store for tests
//! - `FileEventStore`: durable store over an append-only JSONL log
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//! ┌──────────┐    ┌──────────────┐    ┌───────────────┐
//! │ ingest / │───►│ append +     │───►│ update table  │
//! │ ack      │    │ fsync to log │    │ and index     │
//! └──────────┘    └──────────────┘    └───────────────┘
//!
//! Read Path (Startup):
//! ┌───────────────┐    ┌──────────────────┐
//! │ Replay        │───►│ compact if many  │───► Ready!
//! │ events.jsonl  │    │ status updates   │
//! └───────────────┘    └──────────────────┘
//! ```

mod file;
mod log;
mod memory;
mod store;
mod table;

pub use file::{FileEventStore, ReplayReport};
pub use log::LogRecord;
pub use memory::MemoryEventStore;
pub use store::{
    EventStore, EventStoreConfig, StoreError, StoreResult, StoreStats, DEFAULT_COMPACT_THRESHOLD,
};
