//! Winner repository

use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Winner, WinnerStanding},
};

/// Repository for derived winner rows
pub struct WinnerRepository;

impl WinnerRepository {
    /// Serialize recomputations of one contest for the rest of the transaction
    pub async fn lock_contest(conn: &mut PgConnection, contest_id: Uuid) -> AppResult<()> {
        sqlx::query(r#"SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))"#)
            .bind(contest_id.to_string())
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Existing winner rows of a contest
    pub async fn list_for_contest<'e>(
        executor: impl PgExecutor<'e>,
        contest_id: Uuid,
    ) -> AppResult<Vec<Winner>> {
        let winners = sqlx::query_as::<_, Winner>(r#"SELECT * FROM winners WHERE contest_id = $1"#)
            .bind(contest_id)
            .fetch_all(executor)
            .await?;

        Ok(winners)
    }

    /// Insert new rows with their totals and places
    pub async fn insert_many(
        conn: &mut PgConnection,
        contest_id: Uuid,
        rows: &[(Uuid, i64, i32)],
    ) -> AppResult<u64> {
        if rows.is_empty() {
            return Ok(0);
        }
        let (applications, sums, places) = Self::columns(rows);

        let result = sqlx::query(
            r#"
            INSERT INTO winners (contest_id, application_id, sum_rate, place)
            SELECT $1, t.application_id, t.sum_rate, t.place
            FROM UNNEST($2::uuid[], $3::int8[], $4::int4[]) AS t(application_id, sum_rate, place)
            "#,
        )
        .bind(contest_id)
        .bind(&applications)
        .bind(&sums)
        .bind(&places)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Rewrite totals and places of existing rows
    pub async fn update_many(
        conn: &mut PgConnection,
        contest_id: Uuid,
        rows: &[(Uuid, i64, i32)],
    ) -> AppResult<u64> {
        if rows.is_empty() {
            return Ok(0);
        }
        let (applications, sums, places) = Self::columns(rows);

        let result = sqlx::query(
            r#"
            UPDATE winners w
            SET sum_rate = t.sum_rate, place = t.place
            FROM UNNEST($2::uuid[], $3::int8[], $4::int4[]) AS t(application_id, sum_rate, place)
            WHERE w.contest_id = $1 AND w.application_id = t.application_id
            "#,
        )
        .bind(contest_id)
        .bind(&applications)
        .bind(&sums)
        .bind(&places)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Drop rows of applications that are no longer ranked
    pub async fn delete_many(
        conn: &mut PgConnection,
        contest_id: Uuid,
        application_ids: &[Uuid],
    ) -> AppResult<u64> {
        if application_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"DELETE FROM winners WHERE contest_id = $1 AND application_id = ANY($2)"#,
        )
        .bind(contest_id)
        .bind(application_ids)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Ranked rows with display details, grouped then ordered by place
    pub async fn standings<'e>(
        executor: impl PgExecutor<'e>,
        contest_id: Uuid,
    ) -> AppResult<Vec<WinnerStanding>> {
        let standings = sqlx::query_as::<_, WinnerStanding>(
            r#"
            SELECT w.application_id, a.name AS application_name, a.user_id,
                   a.nomination_id, n.name AS nomination_name, a.age_category,
                   w.sum_rate, w.place
            FROM winners w
            JOIN applications a ON a.id = w.application_id
            JOIN nominations n ON n.id = a.nomination_id
            WHERE w.contest_id = $1
            ORDER BY n.name, a.age_category, w.place, a.id
            "#,
        )
        .bind(contest_id)
        .fetch_all(executor)
        .await?;

        Ok(standings)
    }

    fn columns(rows: &[(Uuid, i64, i32)]) -> (Vec<Uuid>, Vec<i64>, Vec<i32>) {
        let mut applications = Vec::with_capacity(rows.len());
        let mut sums = Vec::with_capacity(rows.len());
        let mut places = Vec::with_capacity(rows.len());

        for (application_id, sum_rate, place) in rows {
            applications.push(*application_id);
            sums.push(*sum_rate);
            places.push(*place);
        }

        (applications, sums, places)
    }
}
