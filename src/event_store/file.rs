//! Durable event store backed by an append-only JSONL log
//!
//! Every mutation is appended to `events.jsonl` and fsynced before the
//! in-memory table changes. On open a torn last line (no trailing newline,
//! left by a crash mid-append) is truncated, then the log is replayed to
//! rebuild the table; once enough status updates have piled up the log is
//! compacted to one `inserted` line per event.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::log::LogRecord;
use super::store::{EventStore, EventStoreConfig, StoreError, StoreResult, StoreStats};
use super::table::EventTable;
use crate::types::{Event, EventId, EventStatus, Payload};
use crate::utils::{self, atomic_write_with, cleanup_temp_file};

/// What happened while the log was loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Events rebuilt from the log
    pub events: usize,
    /// Status updates applied on top of them
    pub status_updates: usize,
    /// Lines that could not be parsed or applied
    pub skipped: usize,
    /// Bytes of an unterminated last line cut off before replay
    pub truncated_bytes: u64,
    /// Whether the log was rewritten after replay
    pub compacted: bool,
}

/// Event store persisted to `<data_dir>/events.jsonl`
pub struct FileEventStore {
    config: EventStoreConfig,
    table: RwLock<EventTable>,
    report: ReplayReport,
}

impl FileEventStore {
    /// Open the store, replaying any existing log
    pub fn open(config: EventStoreConfig) -> StoreResult<Self> {
        std::fs::create_dir_all(config.data_dir())?;

        let events_path = config.events_path();
        if cleanup_temp_file(&events_path)? {
            warn!(path = %events_path.display(), "removed leftover temp file from interrupted compaction");
        }

        let truncated_bytes = Self::truncate_torn_tail(&events_path)?;
        if truncated_bytes > 0 {
            warn!(
                path = %events_path.display(),
                bytes = truncated_bytes,
                "truncated unterminated last log line"
            );
        }

        let (table, mut report) = Self::replay(&events_path)?;
        report.truncated_bytes = truncated_bytes;
        report.compacted = config.should_compact(report.status_updates);

        let store = Self {
            config,
            table: RwLock::new(table),
            report,
        };

        if report.compacted {
            store.compact()?;
        }

        info!(
            path = %events_path.display(),
            events = report.events,
            status_updates = report.status_updates,
            skipped = report.skipped,
            truncated_bytes = report.truncated_bytes,
            compacted = report.compacted,
            "event store opened"
        );

        Ok(store)
    }

    /// Get the configuration
    pub fn config(&self) -> &EventStoreConfig {
        &self.config
    }

    /// Summary of the replay performed by `open`
    pub fn replay_report(&self) -> ReplayReport {
        self.report
    }

    /// Cut the log back to its last newline
    ///
    /// Appends always end in `\n`, so bytes after the last newline belong to
    /// a write that never completed and was never acknowledged. Returns the
    /// number of bytes removed.
    fn truncate_torn_tail(events_path: &Path) -> StoreResult<u64> {
        if !events_path.exists() {
            return Ok(0);
        }

        let mut file = OpenOptions::new().read(true).write(true).open(events_path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        if bytes.is_empty() || bytes.ends_with(b"\n") {
            return Ok(0);
        }

        let keep = bytes
            .iter()
            .rposition(|b| *b == b'\n')
            .map_or(0, |pos| pos + 1);
        file.set_len(keep as u64)?;
        file.sync_all()?;

        Ok((bytes.len() - keep) as u64)
    }

    fn replay(events_path: &Path) -> StoreResult<(EventTable, ReplayReport)> {
        let mut table = EventTable::new();
        let mut report = ReplayReport::default();

        if !events_path.exists() {
            return Ok((table, report));
        }

        let file = File::open(events_path)?;
        let reader = BufReader::new(file);

        for (line_num, line_result) in reader.split(b'\n').enumerate() {
            let line = line_result?;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            let record = match LogRecord::from_json_line(&line) {
                Ok(record) => record,
                Err(e) => {
                    warn!(line = line_num + 1, error = %e, "skipping unparseable log line");
                    report.skipped += 1;
                    continue;
                }
            };

            match record {
                LogRecord::Inserted { event } => match table.insert(event) {
                    Ok(()) => report.events += 1,
                    Err(e) => {
                        warn!(line = line_num + 1, error = %e, "skipping log line");
                        report.skipped += 1;
                    }
                },
                LogRecord::StatusUpdated {
                    id,
                    status,
                    acknowledged_at,
                } => match table.update_status(&id, status, acknowledged_at) {
                    Ok(_) => report.status_updates += 1,
                    Err(e) => {
                        warn!(line = line_num + 1, error = %e, "skipping log line");
                        report.skipped += 1;
                    }
                },
            }
        }

        Ok((table, report))
    }

    /// Append one record and sync it to disk
    fn append(&self, record: &LogRecord) -> StoreResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.config.events_path())?;

        let json_line = record.to_json_line()?;
        writeln!(file, "{}", json_line)?;
        file.sync_all()?;

        Ok(())
    }

    /// Rewrite the log so it holds one `inserted` line per event
    ///
    /// Returns the number of events written.
    pub fn compact(&self) -> StoreResult<usize> {
        let table = self.table.write();

        let lines = table
            .events_in_order()
            .into_iter()
            .map(|event| {
                LogRecord::Inserted {
                    event: event.clone(),
                }
                .to_json_line()
            })
            .collect::<Result<Vec<_>, _>>()?;

        atomic_write_with(self.config.events_path(), |file| {
            for line in &lines {
                writeln!(file, "{}", line)?;
            }
            Ok(())
        })?;

        debug!(events = lines.len(), "event log compacted");
        Ok(lines.len())
    }
}

impl EventStore for FileEventStore {
    fn insert(&self, source: String, event_type: String, payload: Payload) -> StoreResult<Event> {
        let mut table = self.table.write();
        let event = Event::new(table.fresh_id(), source, event_type, payload, utils::now());

        self.append(&LogRecord::Inserted {
            event: event.clone(),
        })?;
        table.insert(event.clone())?;

        Ok(event)
    }

    fn get(&self, id: &EventId) -> StoreResult<Option<Event>> {
        Ok(self.table.read().get(id).cloned())
    }

    fn list(&self, status: EventStatus, limit: usize) -> StoreResult<Vec<Event>> {
        Ok(self.table.read().list(status, limit))
    }

    fn update_status(
        &self,
        id: &EventId,
        status: EventStatus,
        acknowledged_at: Option<DateTime<Utc>>,
    ) -> StoreResult<Event> {
        let mut table = self.table.write();
        if !table.contains(id) {
            return Err(StoreError::NotFound(id.clone()));
        }

        self.append(&LogRecord::StatusUpdated {
            id: id.clone(),
            status,
            acknowledged_at,
        })?;
        table.update_status(id, status, acknowledged_at)
    }

    fn stats(&self) -> StoreResult<StoreStats> {
        Ok(self.table.read().stats())
    }
}
