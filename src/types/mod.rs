//! Data types for the event inbox
//!
//! This module contains the core data structures used throughout the application.

mod event;

pub use event::{Event, EventId, EventStatus, Payload, EVENT_ID_PREFIX};
