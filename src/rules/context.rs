//! Context types for access rule evaluation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CurrentStage, ParticipantRole},
};

/// Lookups an access rule may need.
///
/// The production implementation reads participants and blocks from
/// Postgres and resolves stages through the cached resolver; tests mock it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessLookup: Send + Sync {
    /// Check if a participant row with `role` exists for (user, contest)
    async fn has_role(&self, user_id: Uuid, contest_id: Uuid, role: ParticipantRole) -> AppResult<bool>;

    /// Stage of the contest on `today`
    async fn current_stage(&self, contest_id: Uuid, today: NaiveDate) -> AppResult<CurrentStage>;

    /// Check if the user account is blocked right now
    async fn is_blocked(&self, user_id: Uuid) -> AppResult<bool>;
}

/// Who is acting, on which contest, on which day
#[derive(Clone)]
pub struct AccessContext {
    pub user_id: Uuid,
    /// Contest scope of the request; `None` when the caller did not name one
    pub contest_id: Option<Uuid>,
    pub today: NaiveDate,
    pub lookup: Arc<dyn AccessLookup>,
}

impl std::fmt::Debug for AccessContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessContext")
            .field("user_id", &self.user_id)
            .field("contest_id", &self.contest_id)
            .field("today", &self.today)
            .finish()
    }
}

impl AccessContext {
    pub fn new(user_id: Uuid, today: NaiveDate, lookup: Arc<dyn AccessLookup>) -> Self {
        Self {
            user_id,
            contest_id: None,
            today,
            lookup,
        }
    }

    /// Set target contest for evaluation
    pub fn with_contest(mut self, contest_id: Option<Uuid>) -> Self {
        self.contest_id = contest_id;
        self
    }
}
