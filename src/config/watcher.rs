//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::store::ConfigStore;

/// Error raised when the change notifier cannot be started.
#[derive(Debug, thiserror::Error)]
#[error("failed to watch {path}: {source}")]
pub struct WatchError {
    pub path: String,
    #[source]
    pub source: notify::Error,
}

/// A watcher that reloads a [`ConfigStore`] whenever its file changes.
///
/// The parent directory is watched rather than the file itself so that
/// editors and deploy tools that replace the file by rename are picked up.
pub struct ConfigWatcher {
    path: PathBuf,
    store: Arc<ConfigStore>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher for `path`, reloading into `store`.
    pub fn new(path: &Path, store: Arc<ConfigStore>) -> Self {
        Self {
            path: path.to_path_buf(),
            store,
        }
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive; dropping it stops hot reload.
    pub fn run(self) -> Result<RecommendedWatcher, WatchError> {
        let watch_err = |source| WatchError {
            path: self.path.display().to_string(),
            source,
        };

        let file_name = self.path.file_name().map(|n| n.to_os_string());
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let path = self.path.clone();
        let store = self.store;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create()) {
                        return;
                    }
                    let touches_config = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                    if touches_config {
                        tracing::info!(path = %path.display(), "Config file change detected, reloading...");
                        // Failures are logged by the store; the previous snapshot stays active.
                        let _ = store.reload(&path);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )
        .map_err(watch_err)?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(watch_err)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}
