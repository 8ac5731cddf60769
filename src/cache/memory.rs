//! Process-local stage cache

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CachedStage, StageCache};
use crate::error::AppResult;

/// In-memory cache used when no Redis is configured
pub struct MemoryStageCache {
    ttl: Duration,
    entries: RwLock<HashMap<Uuid, (Instant, CachedStage)>>,
}

impl MemoryStageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl StageCache for MemoryStageCache {
    async fn get(&self, contest_id: Uuid) -> AppResult<Option<CachedStage>> {
        let entries = self.entries.read().await;
        let entry = entries
            .get(&contest_id)
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, entry)| *entry);

        Ok(entry)
    }

    async fn set(&self, contest_id: Uuid, entry: CachedStage) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        // Expired entries are dropped lazily on write
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < self.ttl);
        entries.insert(contest_id, (Instant::now(), entry));
        Ok(())
    }

    async fn invalidate(&self, contest_id: Uuid) -> AppResult<()> {
        self.entries.write().await.remove(&contest_id);
        Ok(())
    }
}
