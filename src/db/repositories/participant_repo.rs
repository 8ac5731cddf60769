//! Participant repository

use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Participant, ParticipantRole},
};

/// Repository for contest participants
pub struct ParticipantRepository;

impl ParticipantRepository {
    /// Create a participant row
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        user_id: Uuid,
        contest_id: Uuid,
        role: ParticipantRole,
    ) -> AppResult<Participant> {
        let participant = sqlx::query_as::<_, Participant>(
            r#"
            INSERT INTO participants (user_id, contest_id, role)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(contest_id)
        .bind(role.as_str())
        .fetch_one(executor)
        .await?;

        Ok(participant)
    }

    /// The participant row of a user in a contest, whatever the role
    pub async fn find<'e>(
        executor: impl PgExecutor<'e>,
        user_id: Uuid,
        contest_id: Uuid,
    ) -> AppResult<Option<Participant>> {
        let participant = sqlx::query_as::<_, Participant>(
            r#"SELECT * FROM participants WHERE user_id = $1 AND contest_id = $2"#,
        )
        .bind(user_id)
        .bind(contest_id)
        .fetch_optional(executor)
        .await?;

        Ok(participant)
    }

    /// Find and lock the participant row of a user in a contest
    pub async fn find_for_update(
        conn: &mut PgConnection,
        user_id: Uuid,
        contest_id: Uuid,
    ) -> AppResult<Option<Participant>> {
        let participant = sqlx::query_as::<_, Participant>(
            r#"
            SELECT * FROM participants
            WHERE user_id = $1 AND contest_id = $2
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .bind(contest_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(participant)
    }

    /// Check if a user holds `role` in a contest
    pub async fn has_role<'e>(
        executor: impl PgExecutor<'e>,
        user_id: Uuid,
        contest_id: Uuid,
        role: ParticipantRole,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM participants
                WHERE user_id = $1 AND contest_id = $2 AND role = $3
            )
            "#,
        )
        .bind(user_id)
        .bind(contest_id)
        .bind(role.as_str())
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    /// All participants of a contest, optionally filtered by role
    pub async fn list<'e>(
        executor: impl PgExecutor<'e>,
        contest_id: Uuid,
        role: Option<ParticipantRole>,
    ) -> AppResult<Vec<Participant>> {
        let participants = sqlx::query_as::<_, Participant>(
            r#"
            SELECT * FROM participants
            WHERE contest_id = $1 AND ($2::text IS NULL OR role = $2)
            ORDER BY created_at
            "#,
        )
        .bind(contest_id)
        .bind(role.map(|r| r.as_str()))
        .fetch_all(executor)
        .await?;

        Ok(participants)
    }

    /// Participant rows of the given users in a contest
    pub async fn find_many<'e>(
        executor: impl PgExecutor<'e>,
        contest_id: Uuid,
        user_ids: &[Uuid],
    ) -> AppResult<Vec<Participant>> {
        let participants = sqlx::query_as::<_, Participant>(
            r#"SELECT * FROM participants WHERE contest_id = $1 AND user_id = ANY($2)"#,
        )
        .bind(contest_id)
        .bind(user_ids)
        .fetch_all(executor)
        .await?;

        Ok(participants)
    }

    /// Give `role` to every user in `user_ids`; users already in the contest are skipped
    pub async fn insert_many(
        conn: &mut PgConnection,
        contest_id: Uuid,
        user_ids: &[Uuid],
        role: ParticipantRole,
    ) -> AppResult<u64> {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO participants (user_id, contest_id, role)
            SELECT UNNEST($1::uuid[]), $2, $3
            ON CONFLICT (user_id, contest_id) DO NOTHING
            "#,
        )
        .bind(user_ids)
        .bind(contest_id)
        .bind(role.as_str())
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Remove the given users from a contest, only where they hold `role`
    pub async fn delete_many(
        conn: &mut PgConnection,
        contest_id: Uuid,
        user_ids: &[Uuid],
        role: ParticipantRole,
    ) -> AppResult<u64> {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            DELETE FROM participants
            WHERE contest_id = $1 AND user_id = ANY($2) AND role = $3
            "#,
        )
        .bind(contest_id)
        .bind(user_ids)
        .bind(role.as_str())
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Change the role of an existing participant
    pub async fn update_role<'e>(
        executor: impl PgExecutor<'e>,
        participant_id: Uuid,
        role: ParticipantRole,
    ) -> AppResult<Participant> {
        let participant = sqlx::query_as::<_, Participant>(
            r#"UPDATE participants SET role = $2 WHERE id = $1 RETURNING *"#,
        )
        .bind(participant_id)
        .bind(role.as_str())
        .fetch_one(executor)
        .await?;

        Ok(participant)
    }
}
