//! Utility functions and helpers
//!
//! Timestamp helpers and atomic file rewrites.

pub mod atomic;
pub mod time;

pub use atomic::{atomic_write_with, cleanup_temp_file};
pub use time::now;
