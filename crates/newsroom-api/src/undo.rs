use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ApiError, Result};

/// Kinds of entity that can sit in the undo window
///
/// Serialized under the storage keys the portal UI has always used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "deletedNews")]
    News,
    #[serde(rename = "deletedNewsTarget")]
    Target,
}

impl EntityKind {
    pub fn storage_key(&self) -> &'static str {
        match self {
            EntityKind::News => "deletedNews",
            EntityKind::Target => "deletedNewsTarget",
        }
    }
}

/// A soft deletion the server has not executed yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingDeletion {
    pub id: String,
    pub deleted_at: DateTime<Utc>,
    /// Server-side delay in seconds before the hard delete
    pub delay_seconds: u64,
}

impl PendingDeletion {
    /// End of the undo window; a delay too large to represent never expires
    pub fn expires_at(&self) -> DateTime<Utc> {
        i64::try_from(self.delay_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|delay| self.deleted_at.checked_add_signed(delay))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

/// One undo slot per entity kind, optionally mirrored to a JSON file
///
/// Recording a second deletion of the same kind replaces the first one.
/// Entries past their delay are invisible and get purged on the next write.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PendingDeletions {
    entries: HashMap<EntityKind, PendingDeletion>,
    #[serde(skip)]
    path: Option<PathBuf>,
}

/// The store is shared by every client that can soft-delete
pub type SharedUndoStore = Arc<Mutex<PendingDeletions>>;

impl PendingDeletions {
    /// In-memory store, nothing touches disk
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `path`, or start empty if the file is not there yet
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut store = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str::<PendingDeletions>(&contents).map_err(|e| {
                ApiError::UndoStore(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else {
            Self::new()
        };

        store.path = Some(path);
        Ok(store)
    }

    pub fn shared(self) -> SharedUndoStore {
        Arc::new(Mutex::new(self))
    }

    /// Remember `id` as the pending deletion for `kind`
    pub fn record(&mut self, kind: EntityKind, id: &str, delay_seconds: u64) {
        self.record_at(kind, id, delay_seconds, Utc::now());
    }

    pub fn record_at(
        &mut self,
        kind: EntityKind,
        id: &str,
        delay_seconds: u64,
        now: DateTime<Utc>,
    ) {
        if let Some(previous) = self.entries.get(&kind) {
            if previous.id != id && !previous.is_expired_at(now) {
                warn!(
                    "{} {} replaced by {} - it can no longer be undone from here",
                    kind.storage_key(),
                    previous.id,
                    id
                );
            }
        }

        self.entries.insert(
            kind,
            PendingDeletion {
                id: id.to_string(),
                deleted_at: now,
                delay_seconds,
            },
        );
        self.purge_expired(now);
        self.persist_quietly();
    }

    /// The deletion still inside its undo window, if any
    pub fn pending(&self, kind: EntityKind) -> Option<&PendingDeletion> {
        self.pending_at(kind, Utc::now())
    }

    pub fn pending_at(&self, kind: EntityKind, now: DateTime<Utc>) -> Option<&PendingDeletion> {
        self.entries.get(&kind).filter(|p| !p.is_expired_at(now))
    }

    /// Clear the slot for `kind` if it still holds `id`
    ///
    /// Returns whether something was removed. A slot already taken over by
    /// a later deletion is left alone.
    pub fn clear(&mut self, kind: EntityKind, id: &str) -> bool {
        let holds_id = self.entries.get(&kind).is_some_and(|p| p.id == id);
        if holds_id {
            self.entries.remove(&kind);
            debug!("Cleared {} marker for {}", kind.storage_key(), id);
            self.persist_quietly();
        }
        holds_id
    }

    /// Drop every entry whose window has passed
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, p| !p.is_expired_at(now));
        before - self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write to the backing file, if there is one
    pub fn persist(&self) -> Result<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    // The in-memory slot is what matters for this session
    fn persist_quietly(&self) {
        if let Err(e) = self.persist() {
            warn!("Failed to persist pending deletions: {}", e);
        }
    }
}

/// Lock helper that turns a poisoned mutex into an error
pub(crate) fn with_store<T>(
    store: &SharedUndoStore,
    f: impl FnOnce(&mut PendingDeletions) -> T,
) -> Result<T> {
    let mut guard = store
        .lock()
        .map_err(|e| ApiError::UndoStore(format!("store lock poisoned: {}", e)))?;
    Ok(f(&mut guard))
}
