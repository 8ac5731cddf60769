//! Contest repository

use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{AgeCategory, Contest, ParticipantRole},
};

/// Scalar contest fields written on create
#[derive(Debug, Clone)]
pub struct NewContest<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub avatar: Option<&'a str>,
    pub link_to_rules: Option<&'a str>,
    pub organizer: &'a str,
    pub prizes: Option<&'a str>,
    pub contacts_for_participants: Option<&'a str>,
    pub category: Option<&'a str>,
    pub region: Option<&'a str>,
}

/// Scalar contest fields patched on update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ContestPatch<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub avatar: Option<&'a str>,
    pub link_to_rules: Option<&'a str>,
    pub organizer: Option<&'a str>,
    pub prizes: Option<&'a str>,
    pub contacts_for_participants: Option<&'a str>,
    pub category: Option<&'a str>,
    pub region: Option<&'a str>,
    pub is_draft: Option<bool>,
}

/// Repository for contest database operations
pub struct ContestRepository;

impl ContestRepository {
    /// Create a new contest
    pub async fn create<'e>(executor: impl PgExecutor<'e>, new: &NewContest<'_>) -> AppResult<Contest> {
        let contest = sqlx::query_as::<_, Contest>(
            r#"
            INSERT INTO contests (
                title, description, avatar, link_to_rules, organizer,
                prizes, contacts_for_participants, category, region
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(new.title)
        .bind(new.description)
        .bind(new.avatar)
        .bind(new.link_to_rules)
        .bind(new.organizer)
        .bind(new.prizes)
        .bind(new.contacts_for_participants)
        .bind(new.category)
        .bind(new.region)
        .fetch_one(executor)
        .await?;

        Ok(contest)
    }

    /// Find contest by ID, soft-deleted ones excluded
    pub async fn find_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> AppResult<Option<Contest>> {
        let contest = sqlx::query_as::<_, Contest>(
            r#"SELECT * FROM contests WHERE id = $1 AND NOT is_deleted"#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(contest)
    }

    /// Check whether another contest already uses `title`
    pub async fn title_taken<'e>(
        executor: impl PgExecutor<'e>,
        title: &str,
        except: Option<Uuid>,
    ) -> AppResult<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM contests
                WHERE title = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(title)
        .bind(except)
        .fetch_one(executor)
        .await?;

        Ok(taken)
    }

    /// Patch scalar fields
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: Uuid,
        patch: &ContestPatch<'_>,
    ) -> AppResult<Contest> {
        let contest = sqlx::query_as::<_, Contest>(
            r#"
            UPDATE contests
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                avatar = COALESCE($4, avatar),
                link_to_rules = COALESCE($5, link_to_rules),
                organizer = COALESCE($6, organizer),
                prizes = COALESCE($7, prizes),
                contacts_for_participants = COALESCE($8, contacts_for_participants),
                category = COALESCE($9, category),
                region = COALESCE($10, region),
                is_draft = COALESCE($11, is_draft),
                updated_at = NOW()
            WHERE id = $1 AND NOT is_deleted
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.avatar)
        .bind(patch.link_to_rules)
        .bind(patch.organizer)
        .bind(patch.prizes)
        .bind(patch.contacts_for_participants)
        .bind(patch.category)
        .bind(patch.region)
        .bind(patch.is_draft)
        .fetch_one(executor)
        .await?;

        Ok(contest)
    }

    /// Publish or unpublish
    pub async fn set_published<'e>(
        executor: impl PgExecutor<'e>,
        id: Uuid,
        published: bool,
    ) -> AppResult<Contest> {
        let contest = sqlx::query_as::<_, Contest>(
            r#"
            UPDATE contests
            SET is_published = $2,
                is_draft = CASE WHEN $2 THEN FALSE ELSE is_draft END,
                updated_at = NOW()
            WHERE id = $1 AND NOT is_deleted
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(published)
        .fetch_one(executor)
        .await?;

        Ok(contest)
    }

    /// Soft delete; also withdraws the contest from the catalogue
    pub async fn soft_delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE contests
            SET is_deleted = TRUE, is_published = FALSE, updated_at = NOW()
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Published, non-deleted contests, newest first
    pub async fn list_published<'e>(
        executor: impl PgExecutor<'e>,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<Contest>> {
        let contests = sqlx::query_as::<_, Contest>(
            r#"
            SELECT * FROM contests
            WHERE is_published AND NOT is_deleted
            ORDER BY created_at DESC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(executor)
        .await?;

        Ok(contests)
    }

    /// Count published, non-deleted contests
    pub async fn count_published<'e>(executor: impl PgExecutor<'e>) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM contests WHERE is_published AND NOT is_deleted"#,
        )
        .fetch_one(executor)
        .await?;

        Ok(total)
    }

    /// Contests where `user_id` holds `role`
    pub async fn list_for_participant<'e>(
        executor: impl PgExecutor<'e>,
        user_id: Uuid,
        role: ParticipantRole,
    ) -> AppResult<Vec<Contest>> {
        let contests = sqlx::query_as::<_, Contest>(
            r#"
            SELECT c.* FROM contests c
            JOIN participants p ON p.contest_id = c.id
            WHERE p.user_id = $1 AND p.role = $2 AND NOT c.is_deleted
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(role.as_str())
        .fetch_all(executor)
        .await?;

        Ok(contests)
    }

    /// Get-or-create a category by name
    pub async fn ensure_category<'e>(executor: impl PgExecutor<'e>, name: &str) -> AppResult<()> {
        sqlx::query(r#"INSERT INTO categories (name) VALUES ($1) ON CONFLICT DO NOTHING"#)
            .bind(name)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Age categories attached to a contest
    pub async fn age_categories<'e>(
        executor: impl PgExecutor<'e>,
        contest_id: Uuid,
    ) -> AppResult<Vec<AgeCategory>> {
        let categories = sqlx::query_as::<_, AgeCategory>(
            r#"
            SELECT ac.* FROM age_categories ac
            JOIN contest_age_categories cac ON cac.age_category_id = ac.id
            WHERE cac.contest_id = $1
            ORDER BY ac.start_age, ac.name
            "#,
        )
        .bind(contest_id)
        .fetch_all(executor)
        .await?;

        Ok(categories)
    }

    /// Age categories among `ids` that exist in the dictionary
    pub async fn find_age_categories<'e>(
        executor: impl PgExecutor<'e>,
        ids: &[Uuid],
    ) -> AppResult<Vec<AgeCategory>> {
        let categories = sqlx::query_as::<_, AgeCategory>(
            r#"SELECT * FROM age_categories WHERE id = ANY($1)"#,
        )
        .bind(ids)
        .fetch_all(executor)
        .await?;

        Ok(categories)
    }

    /// Attach and detach age categories in one go
    pub async fn change_age_categories(
        conn: &mut PgConnection,
        contest_id: Uuid,
        added: &[Uuid],
        removed: &[Uuid],
    ) -> AppResult<()> {
        if !removed.is_empty() {
            sqlx::query(
                r#"
                DELETE FROM contest_age_categories
                WHERE contest_id = $1 AND age_category_id = ANY($2)
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
                INSERT INTO contest_age_categories (contest_id, age_category_id)
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
