//! Configuration file watcher for hot reload of origin paths and mode.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::AdapterConfig;

/// Watches the configuration file and publishes every valid revision.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<AdapterConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end for reloaded configs.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<AdapterConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned handle must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    match load_config(&path) {
                        Ok(config) => {
                            tracing::info!(
                                path = %path.display(),
                                origin_paths = config.origin_paths.len(),
                                "Config reloaded"
                            );
                            if tx.send(config).is_err() {
                                tracing::debug!("Config receiver dropped, ignoring reload");
                            }
                        }
                        Err(e) => {
                            tracing::error!(
                                error = %e,
                                "Failed to reload config, keeping current adapter"
                            );
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.path.display(), "Config watcher started");
        Ok(watcher)
    }
}
