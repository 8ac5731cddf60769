//! Nomination repository (dictionary and per-contest configuration)

use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use crate::{error::AppResult, models::ContestNomination};

/// Repository for nominations
pub struct NominationRepository;

impl NominationRepository {
    /// Nominations configured for a contest
    pub async fn list_for_contest<'e>(
        executor: impl PgExecutor<'e>,
        contest_id: Uuid,
    ) -> AppResult<Vec<ContestNomination>> {
        let nominations = sqlx::query_as::<_, ContestNomination>(
            r#"
            SELECT cn.nomination_id, n.name, cn.description
            FROM contest_nominations cn
            JOIN nominations n ON n.id = cn.nomination_id
            WHERE cn.contest_id = $1
            ORDER BY n.name
            "#,
        )
        .bind(contest_id)
        .fetch_all(executor)
        .await?;

        Ok(nominations)
    }

    /// Check whether a nomination is configured for a contest
    pub async fn is_configured<'e>(
        executor: impl PgExecutor<'e>,
        contest_id: Uuid,
        nomination_id: Uuid,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM contest_nominations
                WHERE contest_id = $1 AND nomination_id = $2
            )
            "#,
        )
        .bind(contest_id)
        .bind(nomination_id)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    /// Get-or-create dictionary entries, returning (id, name) for every name
    pub async fn ensure_names(conn: &mut PgConnection, names: &[String]) -> AppResult<Vec<(Uuid, String)>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query(
            r#"
            INSERT INTO nominations (name)
            SELECT UNNEST($1::text[])
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(names)
        .execute(&mut *conn)
        .await?;

        let rows: Vec<(Uuid, String)> =
            sqlx::query_as(r#"SELECT id, name FROM nominations WHERE name = ANY($1)"#)
                .bind(names)
                .fetch_all(&mut *conn)
                .await?;

        Ok(rows)
    }

    /// Attach nominations, or rewrite the description of attached ones
    pub async fn upsert_for_contest(
        conn: &mut PgConnection,
        contest_id: Uuid,
        rows: &[(Uuid, Option<String>)],
    ) -> AppResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = rows.iter().map(|(id, _)| *id).collect();
        let descriptions: Vec<Option<String>> = rows.iter().map(|(_, d)| d.clone()).collect();

        sqlx::query(
            r#"
            INSERT INTO contest_nominations (contest_id, nomination_id, description)
            SELECT $1, t.nomination_id, t.description
            FROM UNNEST($2::uuid[], $3::text[]) AS t(nomination_id, description)
            ON CONFLICT (contest_id, nomination_id)
            DO UPDATE SET description = EXCLUDED.description
            "#,
        )
        .bind(contest_id)
        .bind(&ids)
        .bind(&descriptions)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Detach nominations from a contest
    pub async fn delete_for_contest(
        conn: &mut PgConnection,
        contest_id: Uuid,
        nomination_ids: &[Uuid],
    ) -> AppResult<()> {
        if nomination_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"DELETE FROM contest_nominations WHERE contest_id = $1 AND nomination_id = ANY($2)"#,
        )
        .bind(contest_id)
        .bind(nomination_ids)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
