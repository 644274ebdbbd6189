//! Persisted client state
//!
//! A tiny key-value store used to remember the session id between runs.
//! Persistence is best-effort: read failures look like "no value" and write
//! failures are logged and otherwise ignored.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use tracing::{debug, warn};

/// Best-effort string key-value storage
pub trait KeyValueStore: Send + Sync {
    /// Read a value; unavailable storage reads as `None`
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value; failures are swallowed
    fn set(&self, key: &str, value: &str);
}

/// Store backed by a JSON object file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> anyhow::Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(entries) => entries.get(key).cloned(),
            Err(e) => {
                warn!("Ignoring unreadable state file: {:#}", e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        // An unreadable file is replaced rather than blocking the write.
        let mut entries = self.load().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());

        match self.save(&entries) {
            Ok(()) => debug!("Persisted '{}' to {}", key, self.path.display()),
            Err(e) => warn!("Failed to persist '{}': {:#}", key, e),
        }
    }
}

/// In-process store, forgotten on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }
}
