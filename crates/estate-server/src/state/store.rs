//! Application state: database handle plus a DashMap write-through cache.

use anyhow::Result;
use chrono::Utc;
use dashmap::DashMap;
use estate_core::{EstateDimensions, EstateRecord};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::persistence::{estates, Database};

/// Application state shared by all handlers.
pub struct AppState {
    db: Database,
    config: Config,
    estates: DashMap<String, EstateRecord>,
    recompute_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            config,
            estates: DashMap::new(),
            recompute_locks: DashMap::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }

    /// Persist a new, treeless estate and cache it.
    pub async fn create_estate(&self, dimensions: EstateDimensions) -> Result<EstateRecord> {
        let estate = EstateRecord::new(uuid::Uuid::new_v4().to_string(), dimensions, Utc::now());
        estates::insert_estate(self.pool(), &estate).await?;
        self.cache_estate(estate.clone());
        Ok(estate)
    }

    /// Get an estate from cache, falling back to the database.
    pub async fn get_estate(&self, estate_id: &str) -> Result<Option<EstateRecord>> {
        if let Some(estate) = self.estates.get(estate_id) {
            return Ok(Some(estate.value().clone()));
        }

        let estate = estates::get_estate(self.pool(), estate_id).await?;
        if let Some(estate) = &estate {
            self.cache_estate(estate.clone());
        }
        Ok(estate)
    }

    /// Replace the cached copy after a committed write.
    pub fn cache_estate(&self, estate: EstateRecord) {
        self.estates.insert(estate.id.clone(), estate);
    }

    /// Lock serializing statistics recomputation for one estate.
    pub fn recompute_lock(&self, estate_id: &str) -> Arc<Mutex<()>> {
        self.recompute_locks
            .entry(estate_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    /// Drop the estate's lock once no request holds or waits on it.
    pub fn release_recompute_lock(&self, estate_id: &str) {
        self.recompute_locks.remove_if(estate_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    #[cfg(test)]
    pub(crate) fn recompute_lock_count(&self) -> usize {
        self.recompute_locks.len()
    }
}
