//! Clears a graph before a fresh fixture load.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::store::GraphStore;

/// Nodes deleted per transaction while purging.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Deletes every node and relationship of the bound store.
pub struct Purger<'a> {
    store: &'a dyn GraphStore,
    batch_size: usize,
}

impl<'a> Purger<'a> {
    pub fn new(store: &'a dyn GraphStore) -> Self {
        Self {
            store,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Delete everything, batch by batch. Returns the number of nodes removed.
    pub async fn purge(&self) -> Result<usize> {
        let mut total = 0;
        loop {
            let deleted = self
                .store
                .delete_batch(self.batch_size)
                .await
                .context("Failed to purge database")?;
            if deleted == 0 {
                break;
            }
            total += deleted;
            debug!(deleted, total, "Purged batch");
        }

        info!(nodes = total, "Database purged");
        Ok(total)
    }
}
