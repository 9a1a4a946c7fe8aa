//! JSON file settings store.
//!
//! The whole file is a single object keyed by the decimal user id:
//!
//! ```json
//! {
//!   "123456789": {
//!     "cube_volume": 50,
//!     "head_percentage": 5,
//!     "body_percentage": 18,
//!     "pre_tail_percentage": 2,
//!     "tail_percentage": 10,
//!     "average_head_strength": 81.5,
//!     "updated_at": "2026-01-01T00:00:00Z"
//!   }
//! }
//! ```
//!
//! The file is read on open and re-read whenever its modification time
//! changes, so several processes (the bot and the CLI) can share it. Every
//! save merges the current file contents, then rewrites it through a temp
//! file and a rename. Records that fail to decode are skipped with a warning.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use alembic_core::error::StoreError;
use alembic_core::settings::{SettingsStore, UserConstants, UserId};

/// One persisted record: the constants plus when they were last written.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoredConstants {
    #[serde(flatten)]
    pub constants: UserConstants,
    /// Absent in files written before timestamps were recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Default settings file location: `<data_dir>/alembic/user_data.json`.
pub fn default_settings_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("alembic")
        .join("user_data.json")
}

/// File-backed [`SettingsStore`] with an in-memory cache.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    cache: RwLock<Cache>,
}

#[derive(Debug, Default)]
struct Cache {
    records: HashMap<String, StoredConstants>,
    /// File modification time the cache last caught up with.
    seen: Option<SystemTime>,
}

impl Cache {
    /// Fold the file's records into the cache. A cached record newer than
    /// its on-disk copy (a save whose write failed) is kept.
    fn merge_from(&mut self, path: &Path) {
        for (user, record) in read_records(path) {
            match self.records.get(&user) {
                Some(cached) if cached.updated_at > record.updated_at => {}
                _ => {
                    self.records.insert(user, record);
                }
            }
        }
        self.seen = modified(path);
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

impl JsonFileStore {
    /// Open the store at `path`.
    ///
    /// Never fails: a missing file starts empty, an unreadable or malformed
    /// file starts empty with a warning, a malformed record is dropped.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut cache = Cache::default();
        cache.merge_from(&path);
        debug!(path = %path.display(), users = cache.records.len(), "settings store opened");
        Self {
            path,
            cache: RwLock::new(cache),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of users with saved settings.
    pub fn len(&self) -> usize {
        self.cache.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().records.is_empty()
    }

    /// Saved record for `user`, including its timestamp. Picks up writes
    /// made by other processes since the last look.
    pub fn record(&self, user: UserId) -> Option<StoredConstants> {
        let key = user.to_string();
        {
            let cache = self.cache.read();
            if cache.seen == modified(&self.path) {
                return cache.records.get(&key).copied();
            }
        }
        let mut cache = self.cache.write();
        if cache.seen != modified(&self.path) {
            debug!(path = %self.path.display(), "settings file changed, reloading");
            cache.merge_from(&self.path);
        }
        cache.records.get(&key).copied()
    }

    fn persist(&self, records: &HashMap<String, StoredConstants>) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &json).map_err(|e| StoreError::Io(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            StoreError::Io(e.to_string())
        })
    }
}

fn read_records(path: &Path) -> HashMap<String, StoredConstants> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read settings file, starting empty");
            return HashMap::new();
        }
    };

    let raw: HashMap<String, serde_json::Value> = match serde_json::from_slice(&data) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed settings file, starting empty");
            return HashMap::new();
        }
    };

    raw.into_iter()
        .filter_map(|(user, value)| match serde_json::from_value::<StoredConstants>(value) {
            Ok(record) => Some((user, record)),
            Err(e) => {
                warn!(%user, error = %e, "skipping undecodable settings record");
                None
            }
        })
        .collect()
}

impl SettingsStore for JsonFileStore {
    fn load(&self, user: UserId) -> Option<UserConstants> {
        self.record(user).map(|r| r.constants)
    }

    /// Merges the file's current records before writing, so records saved
    /// by another process survive. Updates the cache first, so a failed
    /// write still serves the new value for the rest of the process lifetime.
    fn save(&self, user: UserId, constants: UserConstants) -> Result<(), StoreError> {
        let mut cache = self.cache.write();
        cache.merge_from(&self.path);
        cache.records.insert(
            user.to_string(),
            StoredConstants {
                constants,
                updated_at: Some(Utc::now()),
            },
        );
        let result = self.persist(&cache.records);
        match &result {
            Ok(()) => {
                cache.seen = modified(&self.path);
                debug!(%user, "settings saved");
            }
            Err(e) => warn!(%user, error = %e, "settings kept in memory only"),
        }
        result
    }
}
