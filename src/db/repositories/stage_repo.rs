//! Stage window repository

use chrono::NaiveDate;
use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{StageKind, StageWindow},
};

/// Repository for contest stage windows
pub struct StageRepository;

impl StageRepository {
    /// All windows of a contest ordered by start date
    pub async fn list_windows<'e>(
        executor: impl PgExecutor<'e>,
        contest_id: Uuid,
    ) -> AppResult<Vec<StageWindow>> {
        let windows = sqlx::query_as::<_, StageWindow>(
            r#"
            SELECT contest_id, stage, start_date, end_date
            FROM contest_stage_windows
            WHERE contest_id = $1
            ORDER BY start_date
            "#,
        )
        .bind(contest_id)
        .fetch_all(executor)
        .await?;

        Ok(windows)
    }

    /// Replace every window of a contest
    pub async fn replace_windows(
        conn: &mut PgConnection,
        contest_id: Uuid,
        windows: &[(StageKind, NaiveDate, NaiveDate)],
    ) -> AppResult<Vec<StageWindow>> {
        sqlx::query(r#"DELETE FROM contest_stage_windows WHERE contest_id = $1"#)
            .bind(contest_id)
            .execute(&mut *conn)
            .await?;

        let stages: Vec<&str> = windows.iter().map(|(stage, _, _)| stage.as_str()).collect();
        let starts: Vec<NaiveDate> = windows.iter().map(|(_, start, _)| *start).collect();
        let ends: Vec<NaiveDate> = windows.iter().map(|(_, _, end)| *end).collect();

        let stored = sqlx::query_as::<_, StageWindow>(
            r#"
            INSERT INTO contest_stage_windows (contest_id, stage, start_date, end_date)
            SELECT $1, stage, start_date, end_date
            FROM UNNEST($2::text[], $3::date[], $4::date[]) AS t(stage, start_date, end_date)
            RETURNING contest_id, stage, start_date, end_date
            "#,
        )
        .bind(contest_id)
        .bind(&stages)
        .bind(&starts)
        .bind(&ends)
        .fetch_all(&mut *conn)
        .await?;

        Ok(stored)
    }
}
