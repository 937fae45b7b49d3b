//! On-disk snapshot of the last fetched relationship list.

use chrono::{DateTime, FixedOffset, Local};
use relprune_common::{PruneError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Snapshot file contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    /// Capture time, RFC 3339.
    pub date: String,
    /// Raw relationship payloads, as received.
    pub friends: Vec<Value>,
    /// Number of entries in `friends`.
    pub total_friends: usize,
}

impl CacheSnapshot {
    /// Parsed capture time.
    pub fn captured_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.date).ok()
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    date: String,
    friends: &'a [Value],
    total_friends: usize,
}

/// Reads and writes [`CacheSnapshot`] files.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrites the snapshot with `friends`.
    #[instrument(skip(self, friends), fields(path = %self.path.display(), count = friends.len()))]
    pub async fn save(&self, friends: &[Value]) -> Result<()> {
        let snapshot = SnapshotRef {
            date: Local::now().to_rfc3339(),
            friends,
            total_friends: friends.len(),
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)?;

        tokio::fs::write(&self.path, bytes).await.map_err(|e| {
            PruneError::cache_with_source(format!("failed to write {}", self.path.display()), e)
        })?;

        debug!("Cached data successfully! 📦 ({} friends)", friends.len());
        Ok(())
    }

    /// Reads the snapshot; `Ok(None)` if the file does not exist.
    pub async fn load(&self) -> Result<Option<CacheSnapshot>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PruneError::cache_with_source(
                    format!("failed to read {}", self.path.display()),
                    e,
                ))
            }
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}
