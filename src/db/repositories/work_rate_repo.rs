//! Work rate repository

use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use crate::{
    db::repositories::CriterionRow,
    error::AppResult,
    models::{ApplicationTotal, WorkRate},
};

/// Repository for jury scores
pub struct WorkRateRepository;

impl WorkRateRepository {
    /// Existing rows of one jury member for one application
    pub async fn list_for_jury<'e>(
        executor: impl PgExecutor<'e>,
        application_id: Uuid,
        jury_id: Uuid,
    ) -> AppResult<Vec<WorkRate>> {
        let rates = sqlx::query_as::<_, WorkRate>(
            r#"
            SELECT * FROM work_rates
            WHERE application_id = $1 AND jury_id = $2
            "#,
        )
        .bind(application_id)
        .bind(jury_id)
        .fetch_all(executor)
        .await?;

        Ok(rates)
    }

    /// All rows one jury member gave within a contest
    pub async fn list_for_jury_in_contest<'e>(
        executor: impl PgExecutor<'e>,
        contest_id: Uuid,
        jury_id: Uuid,
    ) -> AppResult<Vec<WorkRate>> {
        let rates = sqlx::query_as::<_, WorkRate>(
            r#"
            SELECT wr.* FROM work_rates wr
            JOIN applications a ON a.id = wr.application_id
            WHERE a.contest_id = $1 AND wr.jury_id = $2 AND NOT a.is_deleted
            ORDER BY wr.application_id, wr.criteria_id
            "#,
        )
        .bind(contest_id)
        .bind(jury_id)
        .fetch_all(executor)
        .await?;

        Ok(rates)
    }

    /// Insert a batch of rates for one (application, jury)
    pub async fn insert_many(
        conn: &mut PgConnection,
        application_id: Uuid,
        jury_id: Uuid,
        rates: &[(Uuid, i32)],
    ) -> AppResult<Vec<WorkRate>> {
        let criteria: Vec<Uuid> = rates.iter().map(|(id, _)| *id).collect();
        let values: Vec<i32> = rates.iter().map(|(_, rate)| *rate).collect();

        let rows = sqlx::query_as::<_, WorkRate>(
            r#"
            INSERT INTO work_rates (criteria_id, application_id, jury_id, rate)
            SELECT t.criteria_id, $1, $2, t.rate
            FROM UNNEST($3::uuid[], $4::int4[]) AS t(criteria_id, rate)
            RETURNING *
            "#,
        )
        .bind(application_id)
        .bind(jury_id)
        .bind(&criteria)
        .bind(&values)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }

    /// Overwrite existing rates for one (application, jury)
    pub async fn update_many(
        conn: &mut PgConnection,
        application_id: Uuid,
        jury_id: Uuid,
        rates: &[(Uuid, i32)],
    ) -> AppResult<Vec<WorkRate>> {
        let criteria: Vec<Uuid> = rates.iter().map(|(id, _)| *id).collect();
        let values: Vec<i32> = rates.iter().map(|(_, rate)| *rate).collect();

        let rows = sqlx::query_as::<_, WorkRate>(
            r#"
            UPDATE work_rates wr
            SET rate = t.rate
            FROM UNNEST($3::uuid[], $4::int4[]) AS t(criteria_id, rate)
            WHERE wr.application_id = $1 AND wr.jury_id = $2 AND wr.criteria_id = t.criteria_id
            RETURNING wr.*
            "#,
        )
        .bind(application_id)
        .bind(jury_id)
        .bind(&criteria)
        .bind(&values)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }

    /// Drop every rate given under `criteria_ids` in a contest
    pub async fn delete_for_criteria(
        conn: &mut PgConnection,
        contest_id: Uuid,
        criteria_ids: &[Uuid],
    ) -> AppResult<u64> {
        if criteria_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            DELETE FROM work_rates wr
            USING applications a
            WHERE a.id = wr.application_id
              AND a.contest_id = $1
              AND wr.criteria_id = ANY($2)
            "#,
        )
        .bind(contest_id)
        .bind(criteria_ids)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Criteria of `rows` that already hold rates outside the new bounds.
    ///
    /// Only live applications are considered.
    pub async fn out_of_bounds<'e>(
        executor: impl PgExecutor<'e>,
        contest_id: Uuid,
        rows: &[CriterionRow],
    ) -> AppResult<Vec<Uuid>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.criteria_id).collect();
        let mins: Vec<i32> = rows.iter().map(|r| r.min_points).collect();
        let maxs: Vec<i32> = rows.iter().map(|r| r.max_points).collect();

        let offending: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT wr.criteria_id
            FROM work_rates wr
            JOIN applications a ON a.id = wr.application_id
            JOIN UNNEST($2::uuid[], $3::int4[], $4::int4[]) AS t(criteria_id, min_points, max_points)
                ON t.criteria_id = wr.criteria_id
            WHERE a.contest_id = $1
              AND NOT a.is_deleted
              AND (wr.rate < t.min_points OR wr.rate > t.max_points)
            ORDER BY wr.criteria_id
            "#,
        )
        .bind(contest_id)
        .bind(&ids)
        .bind(&mins)
        .bind(&maxs)
        .fetch_all(executor)
        .await?;

        Ok(offending)
    }

    /// Sum of rates per live accepted application of a contest.
    ///
    /// Only rates under criteria the contest still configures count.
    /// Applications without any rate appear with a zero total.
    pub async fn accepted_totals<'e>(
        executor: impl PgExecutor<'e>,
        contest_id: Uuid,
    ) -> AppResult<Vec<ApplicationTotal>> {
        let totals = sqlx::query_as::<_, ApplicationTotal>(
            r#"
            SELECT a.id AS application_id, a.name, a.nomination_id, a.age_category,
                   COALESCE(SUM(wr.rate), 0)::BIGINT AS sum_rate
            FROM applications a
            LEFT JOIN (
                work_rates wr
                JOIN contest_criteria cc
                  ON cc.criteria_id = wr.criteria_id AND cc.contest_id = $1
            ) ON wr.application_id = a.id
            WHERE a.contest_id = $1 AND a.status = 'accepted' AND NOT a.is_deleted
            GROUP BY a.id
            ORDER BY a.nomination_id, a.age_category, sum_rate DESC, a.id
            "#,
        )
        .bind(contest_id)
        .fetch_all(executor)
        .await?;

        Ok(totals)
    }
}
