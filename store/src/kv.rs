//! String key-value persistence with a change-notification channel.
//!
//! This is the storage contract the stores are written against: synchronous
//! get/set/remove over JSON-encoded string values, a single effective
//! writer, and a same-process broadcast carrying the changed key so other
//! readers can re-read. Reads never fail; unreadable backing data is
//! simply absent.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::warn;

/// Capacity of the change-notification channel. A lagging subscriber misses
/// old notifications instead of blocking writers.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to open store directory {dir}: {source}")]
    Open {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write key {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to remove key {key}: {source}")]
    Remove {
        key: String,
        #[source]
        source: io::Error,
    },
}

/// Origin-scoped string store. Writers notify subscribers with the changed
/// key after every successful write.
pub trait KvStore: Send + Sync {
    /// Raw value for a key. Absent or unreadable data is `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, then broadcast the changed key.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key, then broadcast it. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Subscribe to change notifications (the changed key).
    fn subscribe(&self) -> broadcast::Receiver<String>;
}

/// In-memory store for tests and embedding.
pub struct MemoryKv {
    entries: DashMap<String, String>,
    changes: broadcast::Sender<String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        MemoryKv {
            entries: DashMap::new(),
            changes,
        }
    }
}

impl Default for MemoryKv {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        let _ = self.changes.send(key.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        let _ = self.changes.send(key.to_owned());
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.changes.subscribe()
    }
}

/// File-backed store: one `<key>.json` file per key under a directory.
/// Writes are strictly sequential per process; concurrent writers from
/// another process are last-write-wins, as in the storage this models.
pub struct FileKv {
    dir: PathBuf,
    changes: broadcast::Sender<String>,
}

impl FileKv {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Open {
            dir: dir.clone(),
            source,
        })?;
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(FileKv { dir, changes })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KvStore for FileKv {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::write(self.path_for(key), value).map_err(|source| StoreError::Write {
            key: key.to_owned(),
            source,
        })?;
        let _ = self.changes.send(key.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StoreError::Remove {
                    key: key.to_owned(),
                    source,
                })
            }
        }
        let _ = self.changes.send(key.to_owned());
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.changes.subscribe()
    }
}

/// Decode a stored JSON list. Absent data, non-list JSON and parse failures
/// all yield an empty list; malformed state is discarded, never surfaced.
pub(crate) fn decode_list<T: DeserializeOwned>(raw: Option<String>) -> Vec<T> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(err) => {
            warn!(%err, "discarding malformed stored list");
            Vec::new()
        }
    }
}

pub(crate) fn encode<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).expect("serialization should not fail")
}
