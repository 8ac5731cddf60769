//! Stage cache port
//!
//! Resolved contest stages are cached per contest. The resolver talks to
//! the cache through [`StageCache`] so the backing store can be Redis, a
//! process-local map, or nothing at all.

mod memory;
mod redis_cache;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppResult, models::CurrentStage};

pub use memory::MemoryStageCache;
pub use redis_cache::RedisStageCache;

/// A stage resolution together with the day it was resolved for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedStage {
    pub resolved_on: NaiveDate,
    pub stage: CurrentStage,
}

impl CachedStage {
    /// An entry resolved for another day says nothing about `today`
    pub fn valid_for(&self, today: NaiveDate) -> bool {
        self.resolved_on == today
    }
}

/// Key-value store for resolved stages, keyed by contest id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StageCache: Send + Sync {
    async fn get(&self, contest_id: Uuid) -> AppResult<Option<CachedStage>>;

    async fn set(&self, contest_id: Uuid, entry: CachedStage) -> AppResult<()>;

    async fn invalidate(&self, contest_id: Uuid) -> AppResult<()>;
}

/// Cache that never stores anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStageCache;

#[async_trait]
impl StageCache for NoopStageCache {
    async fn get(&self, _contest_id: Uuid) -> AppResult<Option<CachedStage>> {
        Ok(None)
    }

    async fn set(&self, _contest_id: Uuid, _entry: CachedStage) -> AppResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _contest_id: Uuid) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_is_only_valid_for_its_day() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let entry = CachedStage {
            resolved_on: day,
            stage: CurrentStage::Planned,
        };
        assert!(entry.valid_for(day));
        assert!(!entry.valid_for(day.succ_opt().unwrap()));
    }

    #[tokio::test]
    async fn test_noop_cache_never_hits() {
        let cache = NoopStageCache;
        let contest_id = Uuid::new_v4();
        let entry = CachedStage {
            resolved_on: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            stage: CurrentStage::Finished,
        };

        cache.set(contest_id, entry).await.unwrap();
        assert!(cache.get(contest_id).await.unwrap().is_none());
    }
}
