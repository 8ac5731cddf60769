//! Criteria repository (dictionary and per-contest configuration)

use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use crate::{error::AppResult, models::ContestCriterion};

/// Row shape used for bulk writes of contest criteria
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriterionRow {
    pub criteria_id: Uuid,
    pub description: Option<String>,
    pub min_points: i32,
    pub max_points: i32,
}

/// Repository for criteria
pub struct CriteriaRepository;

impl CriteriaRepository {
    /// Criteria configured for a contest
    pub async fn list_for_contest<'e>(
        executor: impl PgExecutor<'e>,
        contest_id: Uuid,
    ) -> AppResult<Vec<ContestCriterion>> {
        let criteria = sqlx::query_as::<_, ContestCriterion>(
            r#"
            SELECT cc.criteria_id, c.name, cc.description, cc.min_points, cc.max_points
            FROM contest_criteria cc
            JOIN criteria c ON c.id = cc.criteria_id
            WHERE cc.contest_id = $1
            ORDER BY c.name
            "#,
        )
        .bind(contest_id)
        .fetch_all(executor)
        .await?;

        Ok(criteria)
    }

    /// Get-or-create dictionary entries, returning (id, name) for every name
    pub async fn ensure_names(conn: &mut PgConnection, names: &[String]) -> AppResult<Vec<(Uuid, String)>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query(
            r#"
            INSERT INTO criteria (name)
            SELECT UNNEST($1::text[])
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(names)
        .execute(&mut *conn)
        .await?;

        let rows: Vec<(Uuid, String)> =
            sqlx::query_as(r#"SELECT id, name FROM criteria WHERE name = ANY($1)"#)
                .bind(names)
                .fetch_all(&mut *conn)
                .await?;

        Ok(rows)
    }

    /// Attach criteria to a contest
    pub async fn insert_for_contest(
        conn: &mut PgConnection,
        contest_id: Uuid,
        rows: &[CriterionRow],
    ) -> AppResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let (ids, descriptions, mins, maxs) = Self::columns(rows);

        sqlx::query(
            r#"
            INSERT INTO contest_criteria (contest_id, criteria_id, description, min_points, max_points)
            SELECT $1, t.criteria_id, t.description, t.min_points, t.max_points
            FROM UNNEST($2::uuid[], $3::text[], $4::int4[], $5::int4[])
                AS t(criteria_id, description, min_points, max_points)
            "#,
        )
        .bind(contest_id)
        .bind(&ids)
        .bind(&descriptions)
        .bind(&mins)
        .bind(&maxs)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Rewrite description and bounds of attached criteria
    pub async fn update_for_contest(
        conn: &mut PgConnection,
        contest_id: Uuid,
        rows: &[CriterionRow],
    ) -> AppResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let (ids, descriptions, mins, maxs) = Self::columns(rows);

        sqlx::query(
            r#"
            UPDATE contest_criteria cc
            SET description = t.description,
                min_points = t.min_points,
                max_points = t.max_points
            FROM UNNEST($2::uuid[], $3::text[], $4::int4[], $5::int4[])
                AS t(criteria_id, description, min_points, max_points)
            WHERE cc.contest_id = $1 AND cc.criteria_id = t.criteria_id
            "#,
        )
        .bind(contest_id)
        .bind(&ids)
        .bind(&descriptions)
        .bind(&mins)
        .bind(&maxs)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Detach criteria from a contest
    pub async fn delete_for_contest(
        conn: &mut PgConnection,
        contest_id: Uuid,
        criteria_ids: &[Uuid],
    ) -> AppResult<()> {
        if criteria_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(r#"DELETE FROM contest_criteria WHERE contest_id = $1 AND criteria_id = ANY($2)"#)
            .bind(contest_id)
            .bind(criteria_ids)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    fn columns(rows: &[CriterionRow]) -> (Vec<Uuid>, Vec<Option<String>>, Vec<i32>, Vec<i32>) {
        let mut ids = Vec::with_capacity(rows.len());
        let mut descriptions = Vec::with_capacity(rows.len());
        let mut mins = Vec::with_capacity(rows.len());
        let mut maxs = Vec::with_capacity(rows.len());

        for row in rows {
            ids.push(row.criteria_id);
            descriptions.push(row.description.clone());
            mins.push(row.min_points);
            maxs.push(row.max_points);
        }

        (ids, descriptions, mins, maxs)
    }
}
