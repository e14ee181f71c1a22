//! Catalog pruner
//!
//! Periodic background task that deletes mirrored posts older than the
//! retention window. Each delete is an independent single-row operation
//! against the store, so the task needs no coordination with handlers.

use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::CatalogConfig;
use crate::database::ChannelPostRepository;

/// Background pruning job for the mirrored catalog
#[derive(Debug)]
pub struct CatalogPruner {
    repository: ChannelPostRepository,
    retention_days: i64,
    interval: Duration,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl CatalogPruner {
    pub fn new(repository: ChannelPostRepository, config: &CatalogConfig) -> Self {
        Self {
            repository,
            retention_days: config.retention_days,
            interval: Duration::from_secs(config.prune_interval_hours * 3600),
            handle: None,
        }
    }

    /// Run one pruning cycle immediately
    pub async fn prune_once(repository: &ChannelPostRepository, retention_days: i64) -> crate::utils::errors::Result<u64> {
        let removed = repository.delete_older_than(retention_days).await?;

        if removed > 0 {
            info!(removed = removed, retention_days = retention_days, "Pruned expired catalog entries");
        }

        Ok(removed)
    }

    /// Start the periodic pruning task. The first tick fires immediately
    /// so a long-stopped bot catches up on startup.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            warn!("Catalog pruner is already running");
            return;
        }

        let repository = self.repository.clone();
        let retention_days = self.retention_days;
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);

            loop {
                ticker.tick().await;

                if let Err(e) = Self::prune_once(&repository, retention_days).await {
                    error!(error = %e, "Catalog pruning cycle failed");
                }
            }
        });

        self.handle = Some(handle);
        info!(interval = ?self.interval, retention_days = self.retention_days, "Started catalog pruner");
    }

    /// Stop the periodic pruning task
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Stopped catalog pruner");
        }
    }
}

impl Drop for CatalogPruner {
    fn drop(&mut self) {
        self.stop();
    }
}
