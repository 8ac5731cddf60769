//! Contest stage resolution behind the stage cache

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    cache::{CachedStage, StageCache},
    db::repositories::StageRepository,
    error::AppResult,
    models::{CurrentStage, StageWindow},
};

/// Source of a contest's configured windows
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StageWindowSource: Send + Sync {
    async fn windows(&self, contest_id: Uuid) -> AppResult<Vec<StageWindow>>;
}

/// Windows read from Postgres
pub struct PgStageWindows {
    db: PgPool,
}

impl PgStageWindows {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StageWindowSource for PgStageWindows {
    async fn windows(&self, contest_id: Uuid) -> AppResult<Vec<StageWindow>> {
        StageRepository::list_windows(&self.db, contest_id).await
    }
}

/// Resolves which stage a contest is in, consulting the cache first
#[derive(Clone)]
pub struct StageResolver {
    windows: Arc<dyn StageWindowSource>,
    cache: Arc<dyn StageCache>,
}

impl StageResolver {
    pub fn new(windows: Arc<dyn StageWindowSource>, cache: Arc<dyn StageCache>) -> Self {
        Self { windows, cache }
    }

    /// Stage of `contest_id` on `today`.
    ///
    /// Cache failures are logged and treated as a miss; only loading the
    /// windows themselves can fail.
    pub async fn current_stage(&self, contest_id: Uuid, today: NaiveDate) -> AppResult<CurrentStage> {
        match self.cache.get(contest_id).await {
            Ok(Some(entry)) if entry.valid_for(today) => {
                tracing::debug!(contest_id = %contest_id, stage = %entry.stage, "Stage cache hit");
                return Ok(entry.stage);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(contest_id = %contest_id, error = %e, "Stage cache read failed");
            }
        }

        let windows = self.windows.windows(contest_id).await?;
        let stage = CurrentStage::resolve(&windows, today);

        let entry = CachedStage {
            resolved_on: today,
            stage,
        };
        if let Err(e) = self.cache.set(contest_id, entry).await {
            tracing::warn!(contest_id = %contest_id, error = %e, "Stage cache write failed");
        }

        tracing::debug!(contest_id = %contest_id, stage = %stage, "Stage resolved");
        Ok(stage)
    }

    /// Drop the cached stage of a contest after its windows change
    pub async fn invalidate(&self, contest_id: Uuid) {
        if let Err(e) = self.cache.invalidate(contest_id).await {
            tracing::warn!(contest_id = %contest_id, error = %e, "Stage cache invalidation failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::{MemoryStageCache, MockStageCache, NoopStageCache},
        error::AppError,
        models::StageKind,
    };
    use std::time::Duration;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn collection_window(contest_id: Uuid) -> Vec<StageWindow> {
        vec![StageWindow {
            contest_id,
            stage: StageKind::Collection,
            start_date: day(1),
            end_date: day(10),
        }]
    }

    #[tokio::test]
    async fn test_second_lookup_on_same_day_hits_cache() {
        let contest_id = Uuid::new_v4();
        let mut windows = MockStageWindowSource::new();
        windows
            .expect_windows()
            .times(1)
            .returning(move |id| Ok(collection_window(id)));

        let resolver = StageResolver::new(
            Arc::new(windows),
            Arc::new(MemoryStageCache::new(Duration::from_secs(60))),
        );

        let first = resolver.current_stage(contest_id, day(5)).await.unwrap();
        let second = resolver.current_stage(contest_id, day(5)).await.unwrap();
        assert!(first.is(StageKind::Collection));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_entry_from_another_day_is_recomputed() {
        let contest_id = Uuid::new_v4();
        let mut windows = MockStageWindowSource::new();
        windows
            .expect_windows()
            .times(2)
            .returning(move |id| Ok(collection_window(id)));

        let resolver = StageResolver::new(
            Arc::new(windows),
            Arc::new(MemoryStageCache::new(Duration::from_secs(60))),
        );

        assert!(resolver.current_stage(contest_id, day(10)).await.unwrap().is(StageKind::Collection));
        assert_eq!(
            resolver.current_stage(contest_id, day(11)).await.unwrap(),
            CurrentStage::Finished
        );
    }

    #[tokio::test]
    async fn test_cache_failures_fall_back_to_windows() {
        let contest_id = Uuid::new_v4();
        let mut windows = MockStageWindowSource::new();
        windows
            .expect_windows()
            .returning(move |id| Ok(collection_window(id)));

        let mut cache = MockStageCache::new();
        cache
            .expect_get()
            .returning(|_| Err(AppError::Redis("connection refused".to_string())));
        cache
            .expect_set()
            .returning(|_, _| Err(AppError::Redis("connection refused".to_string())));

        let resolver = StageResolver::new(Arc::new(windows), Arc::new(cache));
        let stage = resolver.current_stage(contest_id, day(3)).await.unwrap();
        assert!(stage.is(StageKind::Collection));
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let contest_id = Uuid::new_v4();
        let mut windows = MockStageWindowSource::new();
        windows
            .expect_windows()
            .times(2)
            .returning(move |id| Ok(collection_window(id)));

        let resolver = StageResolver::new(
            Arc::new(windows),
            Arc::new(MemoryStageCache::new(Duration::from_secs(60))),
        );

        resolver.current_stage(contest_id, day(5)).await.unwrap();
        resolver.invalidate(contest_id).await;
        resolver.current_stage(contest_id, day(5)).await.unwrap();
    }

    #[tokio::test]
    async fn test_window_load_errors_propagate() {
        let mut windows = MockStageWindowSource::new();
        windows
            .expect_windows()
            .returning(|_| Err(AppError::Database("gone".to_string())));

        let resolver = StageResolver::new(Arc::new(windows), Arc::new(NoopStageCache));
        assert!(resolver.current_stage(Uuid::new_v4(), day(5)).await.is_err());
    }
}
