//! Role and stage authorization
//!
//! Guards are [`AllOf`] compositions of access rules. A failing guard is
//! turned into `AppError::Forbidden` naming the first unmet requirement.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::{ParticipantRepository, UserRepository},
    error::{AppError, AppResult},
    models::{CurrentStage, ParticipantRole, StageKind},
    rules::{
        AccessContext, AccessLookup, AllOf, AnyOf, BoxedSpec, HasContestScope, HasRole, InStage,
        NotBlocked, Spec, Specification,
    },
    services::stage_resolver::StageResolver,
};

/// Access lookups backed by Postgres and the stage resolver
pub struct PgAccessLookup {
    db: PgPool,
    stages: StageResolver,
}

impl PgAccessLookup {
    pub fn new(db: PgPool, stages: StageResolver) -> Self {
        Self { db, stages }
    }
}

#[async_trait]
impl AccessLookup for PgAccessLookup {
    async fn has_role(&self, user_id: Uuid, contest_id: Uuid, role: ParticipantRole) -> AppResult<bool> {
        ParticipantRepository::has_role(&self.db, user_id, contest_id, role).await
    }

    async fn current_stage(&self, contest_id: Uuid, today: NaiveDate) -> AppResult<CurrentStage> {
        self.stages.current_stage(contest_id, today).await
    }

    async fn is_blocked(&self, user_id: Uuid) -> AppResult<bool> {
        let now = Utc::now();
        let blocks = UserRepository::blocks(&self.db, user_id).await?;
        Ok(blocks.iter().any(|block| block.is_active_at(now)))
    }
}

/// Does the actor hold `role` in the context's contest
pub async fn authorize(ctx: &AccessContext, role: ParticipantRole) -> bool {
    HasRole(role).is_satisfied_by(ctx).await
}

/// Is the context's contest in `stage` today
pub async fn authorize_stage(ctx: &AccessContext, stage: StageKind) -> bool {
    InStage(stage).is_satisfied_by(ctx).await
}

/// Ordered set of requirements guarding one operation
pub struct AccessGuard {
    rules: AllOf<AccessContext>,
}

impl AccessGuard {
    fn build(rules: Vec<BoxedSpec<AccessContext>>) -> Self {
        Self {
            rules: AllOf::new(rules),
        }
    }

    /// Any signed-in, unblocked user
    pub fn authenticated() -> Self {
        Self::build(vec![Arc::new(NotBlocked)])
    }

    /// Holder of `role` in the scoped contest
    pub fn role(role: ParticipantRole) -> Self {
        Self::build(vec![
            Arc::new(HasContestScope),
            Arc::new(NotBlocked),
            Arc::new(HasRole(role)),
        ])
    }

    /// Holder of any of `roles` in the scoped contest
    pub fn any_role(roles: &[ParticipantRole]) -> Self {
        let alternatives: Vec<BoxedSpec<AccessContext>> = roles
            .iter()
            .map(|role| Arc::new(HasRole(*role)) as BoxedSpec<AccessContext>)
            .collect();

        Self::build(vec![
            Arc::new(HasContestScope),
            Arc::new(NotBlocked),
            Arc::new(AnyOf::new(alternatives)),
        ])
    }

    /// Any unblocked user while the scoped contest is in `stage`
    pub fn stage(stage: StageKind) -> Self {
        Self::build(vec![
            Arc::new(HasContestScope),
            Arc::new(NotBlocked),
            Arc::new(InStage(stage)),
        ])
    }

    /// Unblocked non-staff user while the scoped contest is in `stage`
    pub fn applicant(stage: StageKind) -> Self {
        let staff = Spec(HasRole(ParticipantRole::Owner))
            | Spec(HasRole(ParticipantRole::OrgCommittee))
            | Spec(HasRole(ParticipantRole::Jury));

        Self::build(vec![
            Arc::new(HasContestScope),
            Arc::new(NotBlocked),
            Arc::new(InStage(stage)),
            Arc::new(!staff),
        ])
    }

    /// Holder of `role` while the scoped contest is in `stage`
    pub fn role_in_stage(role: ParticipantRole, stage: StageKind) -> Self {
        Self::build(vec![
            Arc::new(HasContestScope),
            Arc::new(NotBlocked),
            Arc::new(HasRole(role)),
            Arc::new(InStage(stage)),
        ])
    }

    /// Fail with `Forbidden` naming the first unmet requirement
    pub async fn check(&self, ctx: &AccessContext) -> AppResult<()> {
        let Some(failed) = self.rules.first_unsatisfied(ctx).await else {
            return Ok(());
        };

        let requirement = failed.describe();
        tracing::warn!(
            user_id = %ctx.user_id,
            contest_id = ?ctx.contest_id,
            requirement = %requirement,
            "Access denied"
        );

        Err(AppError::Forbidden(format!("requires {}", requirement)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::context::MockAccessLookup;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    fn jury_lookup(stage: StageKind) -> MockAccessLookup {
        let mut lookup = MockAccessLookup::new();
        lookup.expect_is_blocked().returning(|_| Ok(false));
        lookup
            .expect_has_role()
            .returning(|_, _, role| Ok(role == ParticipantRole::Jury));
        lookup.expect_current_stage().returning(move |_, day| {
            Ok(CurrentStage::Active {
                stage,
                start_date: day,
                end_date: day,
            })
        });
        lookup
    }

    fn ctx(lookup: MockAccessLookup) -> AccessContext {
        AccessContext::new(Uuid::new_v4(), today(), Arc::new(lookup)).with_contest(Some(Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_jury_cannot_pass_owner_guard() {
        let ctx = ctx(jury_lookup(StageKind::Results));

        let err = AccessGuard::role_in_stage(ParticipantRole::Owner, StageKind::Results)
            .check(&ctx)
            .await
            .unwrap_err();

        match err {
            AppError::Forbidden(message) => assert!(message.contains("role owner")),
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_jury_passes_scoring_guard_only_in_evaluation() {
        let guard = AccessGuard::role_in_stage(ParticipantRole::Jury, StageKind::Evaluation);

        assert!(guard.check(&ctx(jury_lookup(StageKind::Evaluation))).await.is_ok());

        let err = guard
            .check(&ctx(jury_lookup(StageKind::Collection)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(ref m) if m.contains("stage evaluation")));
    }

    #[tokio::test]
    async fn test_missing_scope_is_reported_first() {
        let ctx = AccessContext::new(Uuid::new_v4(), today(), Arc::new(MockAccessLookup::new()));

        let err = AccessGuard::role(ParticipantRole::Owner).check(&ctx).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(ref m) if m.contains("contest context")));
    }

    #[tokio::test]
    async fn test_blocked_user_is_denied_everything() {
        let mut lookup = MockAccessLookup::new();
        lookup.expect_is_blocked().returning(|_| Ok(true));
        let ctx = ctx(lookup);

        assert!(AccessGuard::authenticated().check(&ctx).await.is_err());
        assert!(AccessGuard::role(ParticipantRole::Owner).check(&ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_any_role_accepts_alternatives() {
        let ctx = ctx(jury_lookup(StageKind::Evaluation));

        let guard = AccessGuard::any_role(&[ParticipantRole::OrgCommittee, ParticipantRole::Jury]);
        assert!(guard.check(&ctx).await.is_ok());

        let guard = AccessGuard::any_role(&[ParticipantRole::Owner, ParticipantRole::OrgCommittee]);
        assert!(guard.check(&ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_single_predicate_helpers() {
        let ctx = ctx(jury_lookup(StageKind::Evaluation));

        assert!(authorize(&ctx, ParticipantRole::Jury).await);
        assert!(!authorize(&ctx, ParticipantRole::Member).await);
        assert!(authorize_stage(&ctx, StageKind::Evaluation).await);
        assert!(!authorize_stage(&ctx, StageKind::Results).await);
    }

    #[tokio::test]
    async fn test_staff_cannot_pass_applicant_guard() {
        let guard = AccessGuard::applicant(StageKind::Collection);

        let err = guard
            .check(&ctx(jury_lookup(StageKind::Collection)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(ref m) if m.starts_with("requires not (")));

        let mut outsider = MockAccessLookup::new();
        outsider.expect_is_blocked().returning(|_| Ok(false));
        outsider.expect_has_role().returning(|_, _, _| Ok(false));
        outsider.expect_current_stage().returning(|_, day| {
            Ok(CurrentStage::Active {
                stage: StageKind::Collection,
                start_date: day,
                end_date: day,
            })
        });
        assert!(guard.check(&ctx(outsider)).await.is_ok());
    }
}
