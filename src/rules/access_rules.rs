//! Contest access rules.
//!
//! Each rule performs at most one lookup. A lookup failure denies and is
//! logged; rules never surface errors to the caller.

use async_trait::async_trait;

use super::{context::AccessContext, specification::Specification};
use crate::models::{ParticipantRole, StageKind};

/// The request names a contest
pub struct HasContestScope;

#[async_trait]
impl Specification<AccessContext> for HasContestScope {
    async fn is_satisfied_by(&self, ctx: &AccessContext) -> bool {
        if ctx.contest_id.is_none() {
            tracing::warn!(user_id = %ctx.user_id, "Contest-scoped rule evaluated without contest_id");
            return false;
        }
        true
    }

    fn describe(&self) -> String {
        "a contest context".to_string()
    }
}

/// The actor holds `role` in the context's contest.
/// Requires `ctx.contest_id` to be set.
pub struct HasRole(pub ParticipantRole);

#[async_trait]
impl Specification<AccessContext> for HasRole {
    async fn is_satisfied_by(&self, ctx: &AccessContext) -> bool {
        let Some(contest_id) = ctx.contest_id else {
            tracing::warn!(role = %self.0, "HasRole evaluated without contest_id in context");
            return false;
        };

        match ctx.lookup.has_role(ctx.user_id, contest_id, self.0).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(
                    user_id = %ctx.user_id,
                    contest_id = %contest_id,
                    role = %self.0,
                    error = %e,
                    "Role lookup failed, denying"
                );
                false
            }
        }
    }

    fn describe(&self) -> String {
        format!("role {}", self.0)
    }
}

/// The context's contest is in `stage` today.
/// Requires `ctx.contest_id` to be set.
pub struct InStage(pub StageKind);

#[async_trait]
impl Specification<AccessContext> for InStage {
    async fn is_satisfied_by(&self, ctx: &AccessContext) -> bool {
        let Some(contest_id) = ctx.contest_id else {
            tracing::warn!(stage = %self.0, "InStage evaluated without contest_id in context");
            return false;
        };

        match ctx.lookup.current_stage(contest_id, ctx.today).await {
            Ok(current) => current.is(self.0),
            Err(e) => {
                tracing::warn!(
                    contest_id = %contest_id,
                    stage = %self.0,
                    error = %e,
                    "Stage lookup failed, denying"
                );
                false
            }
        }
    }

    fn describe(&self) -> String {
        format!("stage {}", self.0)
    }
}

/// The actor's account is not blocked
pub struct NotBlocked;

#[async_trait]
impl Specification<AccessContext> for NotBlocked {
    async fn is_satisfied_by(&self, ctx: &AccessContext) -> bool {
        match ctx.lookup.is_blocked(ctx.user_id).await {
            Ok(blocked) => !blocked,
            Err(e) => {
                tracing::warn!(user_id = %ctx.user_id, error = %e, "Block lookup failed, denying");
                false
            }
        }
    }

    fn describe(&self) -> String {
        "an account that is not blocked".to_string()
    }
}
