//! Redis-backed stage cache

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use uuid::Uuid;

use super::{CachedStage, StageCache};
use crate::{
    constants::STAGE_CACHE_KEY_PREFIX,
    error::{AppError, AppResult},
};

/// Stores resolved stages as JSON under `contest_stage:{contest_id}` with a TTL
#[derive(Clone)]
pub struct RedisStageCache {
    redis: ConnectionManager,
    ttl: Duration,
}

impl RedisStageCache {
    pub fn new(redis: ConnectionManager, ttl: Duration) -> Self {
        Self { redis, ttl }
    }

    fn key(contest_id: Uuid) -> String {
        format!("{}:{}", STAGE_CACHE_KEY_PREFIX, contest_id)
    }
}

#[async_trait]
impl StageCache for RedisStageCache {
    async fn get(&self, contest_id: Uuid) -> AppResult<Option<CachedStage>> {
        let mut redis = self.redis.clone();
        let raw: Option<String> = redis.get(Self::key(contest_id)).await?;

        raw.map(|value| {
            serde_json::from_str(&value)
                .map_err(|e| AppError::Redis(format!("Malformed cached stage: {}", e)))
        })
        .transpose()
    }

    async fn set(&self, contest_id: Uuid, entry: CachedStage) -> AppResult<()> {
        let mut redis = self.redis.clone();
        let value = serde_json::to_string(&entry)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Stage serialization failed: {}", e)))?;

        redis
            .set_ex::<_, _, ()>(Self::key(contest_id), value, self.ttl.as_secs().max(1))
            .await?;

        Ok(())
    }

    async fn invalidate(&self, contest_id: Uuid) -> AppResult<()> {
        let mut redis = self.redis.clone();
        redis.del::<_, ()>(Self::key(contest_id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let id = Uuid::nil();
        assert_eq!(
            RedisStageCache::key(id),
            "contest_stage:00000000-0000-0000-0000-000000000000"
        );
    }
}
