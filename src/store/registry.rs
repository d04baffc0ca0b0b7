//! One shared store per directory
//!
//! Every spelling of a directory (relative, absolute, trailing separator,
//! through a symlink) canonicalizes to the same key, so all consumers holding
//! the registry see and mutate the same index. The destructive scan runs only
//! the first time a directory is requested.

use crate::config::StoreConfig;
use crate::store::dedup_store::{canonical_directory, DedupStore};
use crate::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Shared handle to a store
pub type SharedStore = Arc<Mutex<DedupStore>>;

/// Canonical directory → store
#[derive(Default)]
pub struct StoreRegistry {
    config: StoreConfig,
    stores: HashMap<PathBuf, SharedStore>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose stores all use `config`
    pub fn with_config(config: StoreConfig) -> Self {
        StoreRegistry {
            config,
            stores: HashMap::new(),
        }
    }

    /// Get the store for a directory, scanning it on first request
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<SharedStore> {
        let directory = canonical_directory(path.as_ref())?;
        if let Some(store) = self.stores.get(&directory) {
            debug!(directory = %directory.display(), "reusing dedup store");
            return Ok(Arc::clone(store));
        }

        let store = Arc::new(Mutex::new(DedupStore::open_with(
            &directory,
            self.config.clone(),
        )?));
        self.stores.insert(directory, Arc::clone(&store));
        Ok(store)
    }

    /// Store for a directory if it was already opened
    pub fn get(&self, path: impl AsRef<Path>) -> Option<SharedStore> {
        let directory = canonical_directory(path.as_ref()).ok()?;
        self.stores.get(&directory).cloned()
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}
