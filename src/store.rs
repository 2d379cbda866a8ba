//! Keyed result store.
//!
//! Transform results persist as JSON blobs on disk, one file per store
//! under a randomly generated name, referenced from a small per-scope
//! session index. The scope stands in for the caller's session identity
//! and is always passed explicitly; two scopes never collide. Within one
//! scope, concurrent writers race last-write-wins on the index — accepted,
//! not coordinated.
//!
//! A slot is either `Idle` (nothing referenced) or `Ready` (a blob is
//! referenced). Operations that recompute a result clear their slot first,
//! so a failed recompute leaves the slot Idle rather than stale. Clearing
//! drops only the reference; superseded blob files stay on disk unmanaged,
//! exactly like the original deployment this store models.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::StoreResult;

/// Lifecycle state of one (scope, kind) slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No result referenced; a fresh transform must run first.
    Idle,
    /// A stored result is available for export.
    Ready,
}

/// Reference from a session index to a stored blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlotRef {
    file: String,
    updated_at: String,
}

type SessionIndex = HashMap<String, SlotRef>;

/// Disk-backed keyed store: `put(scope, kind, value)` / `get(scope, kind)`.
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    /// Open a store rooted at the given directory. Nothing is created
    /// until the first put.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Store a value under (scope, kind). The slot becomes Ready.
    pub fn put(&self, scope: &str, kind: &str, value: &Value) -> StoreResult<()> {
        let scope_dir = self.scope_dir(scope);
        fs::create_dir_all(&scope_dir)?;

        let file = format!("{}_{}.json", kind, Uuid::new_v4());
        fs::write(scope_dir.join(&file), serde_json::to_string(value)?)?;

        let mut index = self.read_index(scope)?;
        index.insert(
            kind.to_string(),
            SlotRef {
                file,
                updated_at: Utc::now().to_rfc3339(),
            },
        );
        self.write_index(scope, &index)
    }

    /// Fetch the value stored under (scope, kind), if any.
    pub fn get(&self, scope: &str, kind: &str) -> StoreResult<Option<Value>> {
        let index = self.read_index(scope)?;
        let Some(slot) = index.get(kind) else {
            return Ok(None);
        };
        let path = self.scope_dir(scope).join(&slot.file);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Drop the reference for (scope, kind). The slot becomes Idle; the
    /// blob file itself is not touched.
    pub fn clear(&self, scope: &str, kind: &str) -> StoreResult<()> {
        let mut index = self.read_index(scope)?;
        if index.remove(kind).is_some() {
            self.write_index(scope, &index)?;
        }
        Ok(())
    }

    /// Current state of a slot.
    pub fn state(&self, scope: &str, kind: &str) -> SlotState {
        match self.read_index(scope) {
            Ok(index) if index.contains_key(kind) => SlotState::Ready,
            _ => SlotState::Idle,
        }
    }

    fn scope_dir(&self, scope: &str) -> PathBuf {
        // Scope doubles as a directory name; keep it path-safe.
        let slug: String = scope
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
            .collect();
        self.dir.join(slug)
    }

    fn index_path(&self, scope: &str) -> PathBuf {
        self.scope_dir(scope).join("session.json")
    }

    fn read_index(&self, scope: &str) -> StoreResult<SessionIndex> {
        let path = self.index_path(scope);
        if !path.exists() {
            return Ok(SessionIndex::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_index(&self, scope: &str, index: &SessionIndex) -> StoreResult<()> {
        fs::write(
            self.index_path(scope),
            serde_json::to_string_pretty(index)?,
        )?;
        Ok(())
    }
}
