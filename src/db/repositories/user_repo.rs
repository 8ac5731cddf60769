//! User repository

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{UserBlock, UserProfile},
};

/// Repository for the user projection and account blocks
pub struct UserRepository;

impl UserRepository {
    /// Find user profile by ID
    pub async fn find_profile<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> AppResult<Option<UserProfile>> {
        let user = sqlx::query_as::<_, UserProfile>(
            r#"SELECT id, email, birth_date, region FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Users among `ids` that exist
    pub async fn existing_ids<'e>(executor: impl PgExecutor<'e>, ids: &[Uuid]) -> AppResult<Vec<Uuid>> {
        let found: Vec<Uuid> = sqlx::query_scalar(r#"SELECT id FROM users WHERE id = ANY($1)"#)
            .bind(ids)
            .fetch_all(executor)
            .await?;

        Ok(found)
    }

    /// Blocks currently flagged on a user
    pub async fn blocks<'e>(executor: impl PgExecutor<'e>, user_id: Uuid) -> AppResult<Vec<UserBlock>> {
        let blocks = sqlx::query_as::<_, UserBlock>(
            r#"
            SELECT id, user_id, blocked_by, blocked_until, unblocked_at, is_blocked, created_at
            FROM user_blocks
            WHERE user_id = $1 AND is_blocked
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(blocks)
    }
}
