//! Durable persistence for column-layout state.
//!
//! `LayoutStore` owns the persistence policy: how storage keys are derived
//! from the user identity and table id, when a record is written versus
//! deleted, and how corrupt or failing storage degrades. The actual byte
//! shuffling lives behind the `LayoutStorage` trait so hosts can plug in
//! whatever key-value store they have.
//!
//! Persistence is strictly best-effort: every storage failure is logged and
//! swallowed, and the in-memory layout state stays correct for the session
//! either way.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use thiserror::Error;

use crate::layout::TableLayoutState;

/// Identity used in storage keys when no authenticated user is available.
pub const ANONYMOUS_IDENTITY: &str = "anonymous";

const KEY_PREFIX: &str = "table-state-";

/// Error produced by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Minimal key-value storage interface, string keys and values only.
///
/// This is the engine's only I/O boundary. Implementations may be backed
/// by browser-style local storage, a settings database, or a plain file.
pub trait LayoutStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Derive the storage key for an `(identity, table id)` pair.
///
/// A missing or empty identity falls back to [`ANONYMOUS_IDENTITY`]. Two
/// tables sharing the same id and identity share the slot and will
/// overwrite each other; that is a documented consequence of the keying
/// scheme, not a guarded invariant.
pub fn storage_key(identity: Option<&str>, table_id: &str) -> String {
    let identity = identity
        .filter(|id| !id.is_empty())
        .unwrap_or(ANONYMOUS_IDENTITY);
    format!("{}{}-{}", KEY_PREFIX, identity, table_id)
}

/// Persistence policy wrapper around a [`LayoutStorage`] backend.
///
/// The store is *hydrated* once its initial `load` has run. Saves
/// attempted before hydration are skipped, so a default-state write
/// triggered during mount can never clobber a persisted record that has
/// not been read yet.
#[derive(Debug)]
pub struct LayoutStore<S> {
    storage: S,
    hydrated: bool,
}

impl<S: LayoutStorage> LayoutStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            hydrated: false,
        }
    }

    /// Whether the initial load has run.
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Mark the store hydrated without loading, for tables that bypass
    /// durable storage entirely (no table id).
    pub fn mark_hydrated(&mut self) {
        self.hydrated = true;
    }

    /// Access the underlying backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the persisted state for an `(identity, table id)` slot.
    ///
    /// Returns `None` when no record exists, when the record fails to
    /// parse, or when the backend errors; the latter two are logged. Also
    /// flips the hydration latch.
    pub fn load(&mut self, identity: Option<&str>, table_id: &str) -> Option<TableLayoutState> {
        self.hydrated = true;
        let key = storage_key(identity, table_id);

        let raw = match self.storage.get_item(&key) {
            Ok(value) => value?,
            Err(err) => {
                log::error!("failed to read layout state for {}: {}", key, err);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(state) => Some(state),
            Err(err) => {
                log::error!("discarding corrupt layout state for {}: {}", key, err);
                None
            }
        }
    }

    /// Persist `state` for an `(identity, table id)` slot.
    ///
    /// A state structurally equal to `default` deletes any existing record
    /// instead of writing the default out: "back to default" means
    /// "nothing to remember". Storage failures are logged and swallowed.
    pub fn save(
        &mut self,
        identity: Option<&str>,
        table_id: &str,
        state: &TableLayoutState,
        default: &TableLayoutState,
    ) {
        if !self.hydrated {
            log::debug!("skipping layout save for {}: store not hydrated yet", table_id);
            return;
        }
        let key = storage_key(identity, table_id);

        let result = if state == default {
            self.storage.remove_item(&key)
        } else {
            match serde_json::to_string(state) {
                Ok(json) => self.storage.set_item(&key, &json),
                Err(err) => {
                    log::error!("failed to serialize layout state for {}: {}", key, err);
                    return;
                }
            }
        };

        if let Err(err) = result {
            log::error!("failed to persist layout state for {}: {}", key, err);
        }
    }
}

/// In-memory backend.
///
/// Clones share the same underlying map, so a test or host can keep a
/// handle for inspection while the engine owns another. Single-threaded,
/// like the rest of the core.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.borrow().contains_key(key)
    }

    /// Raw record for a key, mainly for assertions.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
}

impl LayoutStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// File backend: one JSON object holding every slot, loaded on open and
/// written through on each change.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl JsonFileStorage {
    /// Open (or create) the store at `path`.
    ///
    /// A missing file starts empty. A file that fails to parse also starts
    /// empty, logged as an error, so one corrupt write does not brick every
    /// table's layout.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let items = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(items) => items,
                Err(err) => {
                    log::error!(
                        "discarding corrupt layout store at {}: {}",
                        path.display(),
                        err
                    );
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, items })
    }

    /// Open the store at its default location under the platform config
    /// directory, e.g. `~/.config/<app_name>/table-state.json`.
    pub fn in_config_dir(app_name: &str) -> Result<Self, StorageError> {
        let base = dirs::config_dir()
            .ok_or_else(|| StorageError::Backend("no config directory available".to_string()))?;
        let dir = base.join(app_name);
        fs::create_dir_all(&dir)?;
        Self::open(dir.join("table-state.json"))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(&self.items)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl LayoutStorage for JsonFileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if self.items.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
