//! API module for HTTP endpoints
//!
//! REST surface of the inbox: ingest, list, get and acknowledge.

pub mod http;
pub mod rest;
pub mod state;

pub use http::create_router;
pub use state::AppState;
