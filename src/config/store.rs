//! Shared, atomically swappable config snapshot.
//!
//! Readers call [`ConfigStore::get`] once per request and work on the returned
//! `Arc` for the rest of the evaluation. Reloads parse outside of any lock; only
//! the final pointer swap is serialized, so readers never block on file I/O and
//! never see a half-applied document.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;

use crate::config::loader::{load_config, LoadError};
use crate::config::schema::ConfigSnapshot;
use crate::observability::metrics;

/// Owner of the current [`ConfigSnapshot`].
#[derive(Debug)]
pub struct ConfigStore {
    current: ArcSwap<ConfigSnapshot>,
    generation: AtomicU64,
    /// Serializes writers. Held for the swap only.
    swap_lock: Mutex<()>,
    path: Option<PathBuf>,
}

impl ConfigStore {
    /// Create a store around an in-memory snapshot with no backing file.
    pub fn new(snapshot: ConfigSnapshot) -> Self {
        metrics::record_release_count(snapshot.releases.len());
        Self {
            current: ArcSwap::from_pointee(snapshot),
            generation: AtomicU64::new(1),
            swap_lock: Mutex::new(()),
            path: None,
        }
    }

    /// Load the file at `path` and create a store backed by it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let snapshot = load_config(path)?;
        tracing::info!(
            path = %path.display(),
            releases = snapshot.releases.len(),
            "Config loaded"
        );
        let mut store = Self::new(snapshot);
        store.path = Some(path.to_path_buf());
        Ok(store)
    }

    /// The latest fully-loaded snapshot.
    pub fn get(&self) -> Arc<ConfigSnapshot> {
        self.current.load_full()
    }

    /// Number of successful swaps, starting at 1 for the initial snapshot.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// File this store was opened from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Parse `path` and, on success, swap it in. On failure the current
    /// snapshot stays in place and the error is returned.
    pub fn reload(&self, path: &Path) -> Result<(), LoadError> {
        match load_config(path) {
            Ok(snapshot) => {
                let releases = snapshot.releases.len();
                let generation = self.replace(snapshot);
                metrics::record_reload(true);
                tracing::info!(
                    path = %path.display(),
                    releases,
                    generation,
                    "Config reloaded"
                );
                Ok(())
            }
            Err(e) => {
                metrics::record_reload(false);
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "Failed to reload config. Keeping current configuration."
                );
                Err(e)
            }
        }
    }

    /// Reload from the file the store was opened from. A store without a
    /// backing file has nothing to reload and returns `Ok`.
    pub fn reload_from_source(&self) -> Result<(), LoadError> {
        match &self.path {
            Some(path) => self.reload(path),
            None => Ok(()),
        }
    }

    /// Atomically replace the snapshot. Returns the new generation.
    pub fn replace(&self, snapshot: ConfigSnapshot) -> u64 {
        let releases = snapshot.releases.len();
        let snapshot = Arc::new(snapshot);

        let guard = self.swap_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.current.store(snapshot);
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        drop(guard);

        metrics::record_release_count(releases);
        generation
    }
}
