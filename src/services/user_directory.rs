//! User directory port
//!
//! Account data is owned by the account service; the contest engine only
//! reads the profile fields it needs for eligibility checks.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    models::UserProfile,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Profile of a user; `NotFound` when the account does not exist
    async fn get_user(&self, user_id: Uuid) -> AppResult<UserProfile>;

    /// Which of `user_ids` exist
    async fn existing(&self, user_ids: &[Uuid]) -> AppResult<Vec<Uuid>>;
}

/// Reads the `users` table
pub struct PgUserDirectory {
    db: PgPool,
}

impl PgUserDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn get_user(&self, user_id: Uuid) -> AppResult<UserProfile> {
        UserRepository::find_profile(&self.db, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    async fn existing(&self, user_ids: &[Uuid]) -> AppResult<Vec<Uuid>> {
        UserRepository::existing_ids(&self.db, user_ids).await
    }
}
