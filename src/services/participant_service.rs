//! Participant roster service

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::{ApplicationRepository, ContestRepository, ParticipantRepository},
    error::{AppError, AppResult, id_list},
    handlers::participants::response::RosterResponse,
    models::{Participant, ParticipantRole},
    services::user_directory::UserDirectory,
    utils::diff_by_key,
};

/// Participant service for business logic
pub struct ParticipantService;

impl ParticipantService {
    /// Make `user_ids` the complete roster of `role` (jury or org committee)
    pub async fn set_roster(
        pool: &PgPool,
        users: &dyn UserDirectory,
        contest_id: Uuid,
        role: ParticipantRole,
        user_ids: &[Uuid],
    ) -> AppResult<RosterResponse> {
        if !matches!(role, ParticipantRole::Jury | ParticipantRole::OrgCommittee) {
            return Err(AppError::InvalidInput(format!(
                "Roster of role {} cannot be replaced",
                role
            )));
        }

        let mut desired: Vec<Uuid> = Vec::with_capacity(user_ids.len());
        for id in user_ids {
            if !desired.contains(id) {
                desired.push(*id);
            }
        }

        // Every user must have an account
        let known = users.existing(&desired).await?;
        let unknown: Vec<Uuid> = desired.iter().filter(|id| !known.contains(id)).copied().collect();
        if !unknown.is_empty() {
            return Err(AppError::NotFound(format!("Unknown users: {}", id_list(&unknown))));
        }

        let mut tx = pool.begin().await?;

        if ContestRepository::find_by_id(&mut *tx, contest_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Contest {} not found", contest_id)));
        }

        // Role changes go through change_role; applicants cannot join staff
        let present = ParticipantRepository::find_many(&mut *tx, contest_id, &desired).await?;
        let applicants = ApplicationRepository::authors_with_entries(&mut *tx, contest_id, &desired).await?;
        let problems = roster_conflicts(&present, &applicants, role);
        if !problems.is_empty() {
            return Err(AppError::Conflict(problems.join("; ")));
        }

        let current: Vec<Uuid> = ParticipantRepository::list(&mut *tx, contest_id, Some(role))
            .await?
            .into_iter()
            .map(|p| p.user_id)
            .collect();
        let plan = diff_by_key(&current, &desired, |id| *id);

        ParticipantRepository::delete_many(&mut tx, contest_id, &plan.removed, role).await?;
        ParticipantRepository::insert_many(&mut tx, contest_id, &plan.added, role).await?;

        tx.commit().await?;

        tracing::info!(
            contest_id = %contest_id,
            role = %role,
            added = plan.added.len(),
            removed = plan.removed.len(),
            "Roster replaced"
        );

        Ok(RosterResponse {
            added: plan.added,
            removed: plan.removed,
        })
    }

    /// Move an existing participant to another role
    pub async fn change_role(
        pool: &PgPool,
        contest_id: Uuid,
        user_id: Uuid,
        role: ParticipantRole,
    ) -> AppResult<Participant> {
        if role == ParticipantRole::Owner {
            return Err(AppError::InvalidInput("Owner role cannot be assigned".to_string()));
        }

        let mut tx = pool.begin().await?;

        let participant = ParticipantRepository::find_for_update(&mut tx, user_id, contest_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("User {} does not participate in this contest", user_id))
            })?;

        if participant.role == ParticipantRole::Owner {
            return Err(AppError::Conflict("Contest owner cannot change role".to_string()));
        }
        if participant.role == role {
            return Ok(participant);
        }

        if role.is_staff()
            && !ApplicationRepository::authors_with_entries(&mut *tx, contest_id, &[user_id])
                .await?
                .is_empty()
        {
            return Err(AppError::Conflict(format!(
                "User {} has an application in this contest and cannot become {}",
                user_id, role
            )));
        }

        let updated = ParticipantRepository::update_role(&mut *tx, participant.id, role).await?;

        tx.commit().await?;

        tracing::info!(
            contest_id = %contest_id,
            user_id = %user_id,
            from = %participant.role,
            to = %role,
            "Participant role changed"
        );
        Ok(updated)
    }

    /// Participants of a contest, optionally one role only
    pub async fn list(
        pool: &PgPool,
        contest_id: Uuid,
        role: Option<ParticipantRole>,
    ) -> AppResult<Vec<Participant>> {
        ParticipantRepository::list(pool, contest_id, role).await
    }
}

/// Users whose participant row holds a role other than `role`
fn role_conflicts(present: &[Participant], role: ParticipantRole) -> Vec<Uuid> {
    present
        .iter()
        .filter(|p| p.role != role)
        .map(|p| p.user_id)
        .collect()
}

/// Reasons a roster of `role` cannot take the requested users
fn roster_conflicts(present: &[Participant], applicants: &[Uuid], role: ParticipantRole) -> Vec<String> {
    let mut problems = Vec::new();

    let other_roles = role_conflicts(present, role);
    if !other_roles.is_empty() {
        problems.push(format!(
            "Users already hold another role in this contest: {}",
            id_list(&other_roles)
        ));
    }
    if !applicants.is_empty() {
        problems.push(format!(
            "Users have applications in this contest: {}",
            id_list(applicants)
        ));
    }

    problems
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::services::user_directory::MockUserDirectory;

    fn participant(role: ParticipantRole) -> Participant {
        Participant {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            contest_id: Uuid::new_v4(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_conflicts_report_other_roles() {
        let jury = participant(ParticipantRole::Jury);
        let member = participant(ParticipantRole::Member);
        let owner = participant(ParticipantRole::Owner);

        let conflicts = role_conflicts(&[jury.clone(), member.clone(), owner.clone()], ParticipantRole::Jury);
        assert_eq!(conflicts, vec![member.user_id, owner.user_id]);
    }

    #[test]
    fn test_roster_conflicts_include_applicants() {
        let member = participant(ParticipantRole::Member);
        let applicant = Uuid::new_v4();

        let problems = roster_conflicts(&[member.clone()], &[applicant], ParticipantRole::Jury);
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains(&member.user_id.to_string()));
        assert!(problems[1].contains("applications"));
        assert!(problems[1].contains(&applicant.to_string()));
    }

    #[test]
    fn test_roster_without_conflicts_is_clean() {
        let jury = participant(ParticipantRole::Jury);
        assert!(roster_conflicts(&[jury], &[], ParticipantRole::Jury).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_users_rejected_before_touching_storage() {
        let known = Uuid::new_v4();
        let missing = Uuid::new_v4();

        let mut users = MockUserDirectory::new();
        users.expect_existing().returning(move |_| Ok(vec![known]));

        // Never connected; the directory check fails first
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .expect("lazy pool");

        let err = ParticipantService::set_roster(
            &pool,
            &users,
            Uuid::new_v4(),
            ParticipantRole::Jury,
            &[known, missing],
        )
        .await
        .unwrap_err();

        match err {
            AppError::NotFound(message) => assert!(message.contains(&missing.to_string())),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_member_roster_cannot_be_replaced() {
        let users = MockUserDirectory::new();
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .expect("lazy pool");

        let result =
            ParticipantService::set_roster(&pool, &users, Uuid::new_v4(), ParticipantRole::Member, &[]).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
