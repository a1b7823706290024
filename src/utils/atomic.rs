//! Atomic file rewrites
//!
//! Used when the event log is compacted:
//!
//! 1. Write the new log to a temporary file (.tmp)
//! 2. Call sync_all() to flush to disk
//! 3. Rename temp file over the live log (atomic on most filesystems)
//!
//! A crash leaves either the old log or the new one, never a partial file.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Temp path used while rewriting `path`
pub fn temp_path_for(path: &Path) -> PathBuf {
    path.with_extension("tmp")
}

/// Atomically replace `path` with whatever `write_fn` writes
///
/// ```ignore
/// atomic_write_with("data/events.jsonl", |file| {
///     writeln!(file, "{}", line)?;
///     Ok(())
/// })?;
/// ```
pub fn atomic_write_with<P, F>(path: P, write_fn: F) -> io::Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(&temp_path)?;
    write_fn(&mut file)?;
    file.sync_all()?;

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Remove a temp file left behind by an interrupted rewrite of `path`
///
/// Returns `true` if a stale file was removed.
pub fn cleanup_temp_file<P: AsRef<Path>>(path: P) -> io::Result<bool> {
    let temp_path = temp_path_for(path.as_ref());
    if !temp_path.exists() {
        return Ok(false);
    }
    fs::remove_file(&temp_path)?;
    Ok(true)
}
