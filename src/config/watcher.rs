//! Scaling bounds file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::cluster::{load_cluster_config, ClusterConfig};

/// A watcher that monitors the scaling bounds file for changes.
pub struct ClusterConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ClusterConfig>,
}

impl ClusterConfigWatcher {
    /// Create a new ClusterConfigWatcher.
    ///
    /// Returns the watcher and a receiver for validated bounds.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ClusterConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for events to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        reload(&path, &tx);
                    }
                }
                Err(e) => tracing::error!(error = %e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Cluster config watcher started");
        Ok(watcher)
    }
}

fn reload(path: &Path, tx: &mpsc::UnboundedSender<ClusterConfig>) {
    tracing::info!(path = ?path, "Cluster config change detected, reloading");
    match load_cluster_config(path) {
        Ok(bounds) => {
            tracing::info!(
                min_nodes = bounds.min_nodes,
                max_nodes = bounds.max_nodes,
                "Cluster scaling bounds reloaded"
            );
            let _ = tx.send(bounds);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to reload cluster config, keeping current bounds");
        }
    }
}
