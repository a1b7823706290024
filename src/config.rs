use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use dotenvy::dotenv;

use crate::event_store::{EventStoreConfig, DEFAULT_COMPACT_THRESHOLD};

/// Which event store backend the server runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// Append-only JSONL log under the data directory
    File,
    /// Process memory only; everything is lost on exit
    Memory,
}

impl StorageKind {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageKind::File),
            "memory" => Ok(StorageKind::Memory),
            other => bail!("INBOX_STORAGE must be 'file' or 'memory', got '{}'", other),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub storage: StorageKind,
    pub data_dir: PathBuf,
    pub compact_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            storage: StorageKind::File,
            data_dir: PathBuf::from("data"),
            compact_threshold: DEFAULT_COMPACT_THRESHOLD,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            host: match lookup("INBOX_HOST") {
                Some(host) => host
                    .parse()
                    .with_context(|| format!("INBOX_HOST must be an IP address, got '{}'", host))?,
                None => defaults.host,
            },
            port: match lookup("INBOX_PORT") {
                Some(port) => port.parse().context("INBOX_PORT must be a valid number")?,
                None => defaults.port,
            },
            storage: match lookup("INBOX_STORAGE") {
                Some(kind) => StorageKind::parse(&kind)?,
                None => defaults.storage,
            },
            data_dir: lookup("INBOX_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            compact_threshold: match lookup("INBOX_COMPACT_THRESHOLD") {
                Some(threshold) => threshold
                    .parse()
                    .context("INBOX_COMPACT_THRESHOLD must be a non-negative number")?,
                None => defaults.compact_threshold,
            },
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn store_config(&self) -> EventStoreConfig {
        EventStoreConfig::new(&self.data_dir).with_compact_threshold(self.compact_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8000");
        assert_eq!(config.storage, StorageKind::File);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.compact_threshold, DEFAULT_COMPACT_THRESHOLD);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("INBOX_HOST", "127.0.0.1"),
            ("INBOX_PORT", "9100"),
            ("INBOX_STORAGE", "Memory"),
            ("INBOX_DATA_DIR", "/var/lib/inbox"),
            ("INBOX_COMPACT_THRESHOLD", "0"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:9100");
        assert_eq!(config.storage, StorageKind::Memory);
        assert_eq!(
            config.store_config().events_path(),
            PathBuf::from("/var/lib/inbox/events.jsonl")
        );
        assert!(!config.store_config().should_compact(10_000));
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_lookup(lookup(&[("INBOX_PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(lookup(&[("INBOX_STORAGE", "sqlite")])).is_err());
        assert!(Config::from_lookup(lookup(&[("INBOX_HOST", "not-an-ip")])).is_err());
        assert!(Config::from_lookup(lookup(&[("INBOX_COMPACT_THRESHOLD", "-1")])).is_err());
    }
}
