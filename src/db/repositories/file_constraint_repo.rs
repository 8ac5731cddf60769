//! File constraint repository (read-only dictionary and per-contest selection)

use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use crate::{error::AppResult, models::FileConstraint};

/// Repository for file constraints
pub struct FileConstraintRepository;

impl FileConstraintRepository {
    /// Whole dictionary
    pub async fn list_all<'e>(executor: impl PgExecutor<'e>) -> AppResult<Vec<FileConstraint>> {
        let constraints = sqlx::query_as::<_, FileConstraint>(
            r#"SELECT * FROM file_constraints ORDER BY name"#,
        )
        .fetch_all(executor)
        .await?;

        Ok(constraints)
    }

    /// Dictionary entries among `ids`
    pub async fn find_many<'e>(executor: impl PgExecutor<'e>, ids: &[Uuid]) -> AppResult<Vec<FileConstraint>> {
        let constraints = sqlx::query_as::<_, FileConstraint>(
            r#"SELECT * FROM file_constraints WHERE id = ANY($1)"#,
        )
        .bind(ids)
        .fetch_all(executor)
        .await?;

        Ok(constraints)
    }

    /// Constraints attached to a contest
    pub async fn list_for_contest<'e>(
        executor: impl PgExecutor<'e>,
        contest_id: Uuid,
    ) -> AppResult<Vec<FileConstraint>> {
        let constraints = sqlx::query_as::<_, FileConstraint>(
            r#"
            SELECT fc.* FROM file_constraints fc
            JOIN contest_file_constraints cfc ON cfc.file_constraint_id = fc.id
            WHERE cfc.contest_id = $1
            ORDER BY fc.name
            "#,
        )
        .bind(contest_id)
        .fetch_all(executor)
        .await?;

        Ok(constraints)
    }

    /// Attach and detach constraints in one go
    pub async fn change_for_contest(
        conn: &mut PgConnection,
        contest_id: Uuid,
        added: &[Uuid],
        removed: &[Uuid],
    ) -> AppResult<()> {
        if !removed.is_empty() {
            sqlx::query(
                r#"
                DELETE FROM contest_file_constraints
                WHERE contest_id = $1 AND file_constraint_id = ANY($2)
                "#,
            )
            .bind(contest_id)
            .bind(removed)
            .execute(&mut *conn)
            .await?;
        }

        if !added.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO contest_file_constraints (contest_id, file_constraint_id)
                SELECT $1, UNNEST($2::uuid[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(contest_id)
            .bind(added)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }
}
