//! Application repository

use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Application, ApplicationStatus},
};

/// Fields written when an application is submitted
#[derive(Debug, Clone)]
pub struct NewApplication<'a> {
    pub name: &'a str,
    pub annotation: &'a str,
    pub link_to_work: Option<&'a str>,
    pub age_category: &'a str,
    pub nomination_id: Uuid,
    pub contest_id: Uuid,
    pub user_id: Uuid,
}

/// Repository for applications
pub struct ApplicationRepository;

impl ApplicationRepository {
    /// Insert a pending application
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        new: &NewApplication<'_>,
    ) -> AppResult<Application> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (
                name, annotation, link_to_work, age_category,
                nomination_id, contest_id, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(new.name)
        .bind(new.annotation)
        .bind(new.link_to_work)
        .bind(new.age_category)
        .bind(new.nomination_id)
        .bind(new.contest_id)
        .bind(new.user_id)
        .fetch_one(executor)
        .await?;

        Ok(application)
    }

    /// Find a live application by ID
    pub async fn find_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> AppResult<Option<Application>> {
        let application = sqlx::query_as::<_, Application>(
            r#"SELECT * FROM applications WHERE id = $1 AND NOT is_deleted"#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(application)
    }

    /// Find and lock a live application of a contest
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: Uuid,
        contest_id: Uuid,
    ) -> AppResult<Option<Application>> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            SELECT * FROM applications
            WHERE id = $1 AND contest_id = $2 AND NOT is_deleted
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(contest_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(application)
    }

    /// Lock the live applications of a contest among `ids`
    pub async fn find_many_for_update(
        conn: &mut PgConnection,
        contest_id: Uuid,
        ids: &[Uuid],
    ) -> AppResult<Vec<Application>> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            SELECT * FROM applications
            WHERE contest_id = $1 AND id = ANY($2) AND NOT is_deleted
            FOR UPDATE
            "#,
        )
        .bind(contest_id)
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;

        Ok(applications)
    }

    /// Check for a live application by the same author in the same nomination
    pub async fn author_has_entry<'e>(
        executor: impl PgExecutor<'e>,
        user_id: Uuid,
        contest_id: Uuid,
        nomination_id: Uuid,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM applications
                WHERE user_id = $1 AND contest_id = $2 AND nomination_id = $3 AND NOT is_deleted
            )
            "#,
        )
        .bind(user_id)
        .bind(contest_id)
        .bind(nomination_id)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    /// Users among `user_ids` with a live application in a contest
    pub async fn authors_with_entries<'e>(
        executor: impl PgExecutor<'e>,
        contest_id: Uuid,
        user_ids: &[Uuid],
    ) -> AppResult<Vec<Uuid>> {
        let authors: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT user_id FROM applications
            WHERE contest_id = $1 AND user_id = ANY($2) AND NOT is_deleted
            ORDER BY user_id
            "#,
        )
        .bind(contest_id)
        .bind(user_ids)
        .fetch_all(executor)
        .await?;

        Ok(authors)
    }

    /// Check for a live application with the same name in the same nomination
    pub async fn name_taken<'e>(
        executor: impl PgExecutor<'e>,
        name: &str,
        contest_id: Uuid,
        nomination_id: Uuid,
        except: Option<Uuid>,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM applications
                WHERE name = $1 AND contest_id = $2 AND nomination_id = $3
                  AND NOT is_deleted AND ($4::uuid IS NULL OR id <> $4)
            )
            "#,
        )
        .bind(name)
        .bind(contest_id)
        .bind(nomination_id)
        .bind(except)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    /// Patch the author-editable fields
    pub async fn update_content<'e>(
        executor: impl PgExecutor<'e>,
        id: Uuid,
        name: Option<&str>,
        annotation: Option<&str>,
        link_to_work: Option<&str>,
    ) -> AppResult<Application> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET name = COALESCE($2, name),
                annotation = COALESCE($3, annotation),
                link_to_work = COALESCE($4, link_to_work),
                updated_at = NOW()
            WHERE id = $1 AND NOT is_deleted
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(annotation)
        .bind(link_to_work)
        .fetch_one(executor)
        .await?;

        Ok(application)
    }

    /// Mark applications accepted and clear any rejection reason
    pub async fn accept_many(conn: &mut PgConnection, ids: &[Uuid]) -> AppResult<Vec<Application>> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET status = 'accepted', rejection_reason = NULL, updated_at = NOW()
            WHERE id = ANY($1)
            RETURNING *
            "#,
        )
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;

        Ok(applications)
    }

    /// Mark an application rejected with a reason
    pub async fn reject<'e>(executor: impl PgExecutor<'e>, id: Uuid, reason: &str) -> AppResult<Application> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET status = 'rejected', rejection_reason = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reason)
        .fetch_one(executor)
        .await?;

        Ok(application)
    }

    /// Soft delete
    pub async fn soft_delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> AppResult<()> {
        sqlx::query(r#"UPDATE applications SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1"#)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Live applications of a contest with the given status
    pub async fn list_by_status<'e>(
        executor: impl PgExecutor<'e>,
        contest_id: Uuid,
        status: ApplicationStatus,
    ) -> AppResult<Vec<Application>> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            SELECT * FROM applications
            WHERE contest_id = $1 AND status = $2 AND NOT is_deleted
            ORDER BY created_at
            "#,
        )
        .bind(contest_id)
        .bind(status.as_str())
        .fetch_all(executor)
        .await?;

        Ok(applications)
    }

    /// Live applications of one author across contests
    pub async fn list_by_user<'e>(executor: impl PgExecutor<'e>, user_id: Uuid) -> AppResult<Vec<Application>> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            SELECT * FROM applications
            WHERE user_id = $1 AND NOT is_deleted
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(applications)
    }
}
