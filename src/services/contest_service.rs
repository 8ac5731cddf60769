//! Contest configuration service

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::{
        ContestPatch, ContestRepository, CriteriaRepository, CriterionRow, FileConstraintRepository,
        NewContest, NominationRepository, ParticipantRepository, StageRepository, WorkRateRepository,
    },
    error::{AppError, AppResult, id_list},
    handlers::contests::{
        request::{
            CreateContestRequest, CriterionInput, NominationInput, ReplaceCriteriaRequest,
            ReplaceFileConstraintsRequest, ReplaceNominationsRequest, ReplaceStagesRequest,
            UpdateContestRequest,
        },
        response::{
            ContestDetailResponse, ContestsListResponse, FileConstraintsResponse, ReconcileResponse,
            StagesResponse,
        },
    },
    models::{
        Contest, ContestCriterion, ContestNomination, CurrentStage, FileConstraint, ParticipantRole,
        StageKind,
    },
    services::stage_resolver::StageResolver,
    utils::{
        diff::{Diff, diff_by_key},
        validation::{validate_criteria, validate_nominations, validate_stage_windows},
    },
};

/// Comparable shape of one contest criterion, keyed by name
#[derive(Debug, Clone, PartialEq, Eq)]
struct CriterionDraft {
    name: String,
    description: Option<String>,
    min_points: i32,
    max_points: i32,
}

impl From<&ContestCriterion> for CriterionDraft {
    fn from(c: &ContestCriterion) -> Self {
        Self {
            name: c.name.clone(),
            description: c.description.clone(),
            min_points: c.min_points,
            max_points: c.max_points,
        }
    }
}

impl From<&CriterionInput> for CriterionDraft {
    fn from(c: &CriterionInput) -> Self {
        Self {
            name: c.name.trim().to_string(),
            description: c.description.clone(),
            min_points: c.min_points,
            max_points: c.max_points,
        }
    }
}

/// Comparable shape of one contest nomination, keyed by name
#[derive(Debug, Clone, PartialEq, Eq)]
struct NominationDraft {
    name: String,
    description: Option<String>,
}

impl From<&ContestNomination> for NominationDraft {
    fn from(n: &ContestNomination) -> Self {
        Self {
            name: n.name.clone(),
            description: n.description.clone(),
        }
    }
}

impl From<&NominationInput> for NominationDraft {
    fn from(n: &NominationInput) -> Self {
        Self {
            name: n.name.trim().to_string(),
            description: n.description.clone(),
        }
    }
}

fn names<T>(items: &[T], name: impl Fn(&T) -> &str) -> Vec<String> {
    items.iter().map(|item| name(item).to_string()).collect()
}

/// Contest service for business logic
pub struct ContestService;

impl ContestService {
    /// Create a contest; the creator becomes its owner
    pub async fn create_contest(
        pool: &PgPool,
        stages: &StageResolver,
        creator_id: Uuid,
        payload: CreateContestRequest,
        today: NaiveDate,
    ) -> AppResult<ContestDetailResponse> {
        let mut tx = pool.begin().await?;

        if ContestRepository::title_taken(&mut *tx, &payload.title, None).await? {
            return Err(AppError::Conflict(format!(
                "Contest titled '{}' already exists",
                payload.title
            )));
        }

        let requested: Vec<Uuid> = dedup(&payload.age_category_ids);
        let found = ContestRepository::find_age_categories(&mut *tx, &requested).await?;
        let unknown: Vec<Uuid> = requested
            .iter()
            .filter(|id| !found.iter().any(|c| c.id == **id))
            .copied()
            .collect();
        if !unknown.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Unknown age categories: {}",
                id_list(&unknown)
            )));
        }

        if let Some(category) = payload.category.as_deref() {
            ContestRepository::ensure_category(&mut *tx, category).await?;
        }

        let contest = ContestRepository::create(
            &mut *tx,
            &NewContest {
                title: &payload.title,
                description: payload.description.as_deref().unwrap_or_default(),
                avatar: payload.avatar.as_deref(),
                link_to_rules: payload.link_to_rules.as_deref(),
                organizer: &payload.organizer,
                prizes: payload.prizes.as_deref(),
                contacts_for_participants: payload.contacts_for_participants.as_deref(),
                category: payload.category.as_deref(),
                region: payload.region.as_deref(),
            },
        )
        .await?;

        ContestRepository::change_age_categories(&mut tx, contest.id, &requested, &[]).await?;
        ParticipantRepository::create(&mut *tx, creator_id, contest.id, ParticipantRole::Owner).await?;

        tx.commit().await?;

        tracing::info!(contest_id = %contest.id, owner = %creator_id, "Contest created");
        Self::detail(pool, stages, contest, today).await
    }

    /// Get a live contest with its configuration
    pub async fn get_contest(
        pool: &PgPool,
        stages: &StageResolver,
        id: Uuid,
        today: NaiveDate,
    ) -> AppResult<ContestDetailResponse> {
        let contest = Self::find(pool, id).await?;
        Self::detail(pool, stages, contest, today).await
    }

    /// Published catalogue, newest first
    pub async fn list_published(pool: &PgPool, page: u32, per_page: u32) -> AppResult<ContestsListResponse> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, 100);
        let offset = (i64::from(page) - 1) * i64::from(per_page);

        let contests = ContestRepository::list_published(pool, offset, i64::from(per_page)).await?;
        let total = ContestRepository::count_published(pool).await?;

        Ok(ContestsListResponse {
            contests,
            total,
            page,
            per_page,
        })
    }

    /// Contests where the user holds `role` (owner: "my contests", jury: "contests I judge")
    pub async fn list_for_role(pool: &PgPool, user_id: Uuid, role: ParticipantRole) -> AppResult<Vec<Contest>> {
        ContestRepository::list_for_participant(pool, user_id, role).await
    }

    /// Patch scalar fields and replace age categories
    pub async fn update_contest(
        pool: &PgPool,
        stages: &StageResolver,
        id: Uuid,
        payload: UpdateContestRequest,
        today: NaiveDate,
    ) -> AppResult<ContestDetailResponse> {
        let mut tx = pool.begin().await?;

        if ContestRepository::find_by_id(&mut *tx, id).await?.is_none() {
            return Err(AppError::NotFound(format!("Contest {} not found", id)));
        }

        if let Some(title) = payload.title.as_deref() {
            if ContestRepository::title_taken(&mut *tx, title, Some(id)).await? {
                return Err(AppError::Conflict(format!("Contest titled '{}' already exists", title)));
            }
        }

        if let Some(requested) = payload.age_category_ids.as_deref() {
            let requested = dedup(requested);
            let found = ContestRepository::find_age_categories(&mut *tx, &requested).await?;
            let unknown: Vec<Uuid> = requested
                .iter()
                .filter(|id| !found.iter().any(|c| c.id == **id))
                .copied()
                .collect();
            if !unknown.is_empty() {
                return Err(AppError::InvalidInput(format!(
                    "Unknown age categories: {}",
                    id_list(&unknown)
                )));
            }

            let current: Vec<Uuid> = ContestRepository::age_categories(&mut *tx, id)
                .await?
                .into_iter()
                .map(|c| c.id)
                .collect();
            let diff = diff_by_key(&current, &requested, |id| *id);
            ContestRepository::change_age_categories(&mut tx, id, &diff.added, &diff.removed).await?;
        }

        if let Some(category) = payload.category.as_deref() {
            ContestRepository::ensure_category(&mut *tx, category).await?;
        }

        let contest = ContestRepository::update(
            &mut *tx,
            id,
            &ContestPatch {
                title: payload.title.as_deref(),
                description: payload.description.as_deref(),
                avatar: payload.avatar.as_deref(),
                link_to_rules: payload.link_to_rules.as_deref(),
                organizer: payload.organizer.as_deref(),
                prizes: payload.prizes.as_deref(),
                contacts_for_participants: payload.contacts_for_participants.as_deref(),
                category: payload.category.as_deref(),
                region: payload.region.as_deref(),
                is_draft: payload.is_draft,
            },
        )
        .await?;

        tx.commit().await?;

        Self::detail(pool, stages, contest, today).await
    }

    /// Show or hide the contest in the public catalogue
    pub async fn set_published(pool: &PgPool, id: Uuid, published: bool) -> AppResult<Contest> {
        Self::find(pool, id).await?;
        let contest = ContestRepository::set_published(pool, id, published).await?;

        tracing::info!(contest_id = %id, published, "Contest visibility changed");
        Ok(contest)
    }

    /// Soft delete
    pub async fn delete_contest(pool: &PgPool, id: Uuid) -> AppResult<()> {
        if !ContestRepository::soft_delete(pool, id).await? {
            return Err(AppError::NotFound(format!("Contest {} not found", id)));
        }

        tracing::info!(contest_id = %id, "Contest deleted");
        Ok(())
    }

    /// Replace the criteria of a contest, matching existing ones by name
    pub async fn replace_criteria(
        pool: &PgPool,
        contest_id: Uuid,
        payload: ReplaceCriteriaRequest,
    ) -> AppResult<ReconcileResponse> {
        let desired: Vec<CriterionDraft> = payload.criteria.iter().map(CriterionDraft::from).collect();
        let checks: Vec<(String, i32, i32)> = desired
            .iter()
            .map(|c| (c.name.clone(), c.min_points, c.max_points))
            .collect();
        validate_criteria(&checks).map_err(|problems| AppError::InvalidInput(problems.join("; ")))?;

        let mut tx = pool.begin().await?;
        Self::find(&mut *tx, contest_id).await?;

        let current = CriteriaRepository::list_for_contest(&mut *tx, contest_id).await?;
        let current_ids: HashMap<&str, Uuid> =
            current.iter().map(|c| (c.name.as_str(), c.criteria_id)).collect();
        let diff = plan_criteria(&current, &desired);

        let updated_rows: Vec<CriterionRow> = diff
            .updated
            .iter()
            .filter_map(|c| {
                current_ids.get(c.name.as_str()).map(|id| CriterionRow {
                    criteria_id: *id,
                    description: c.description.clone(),
                    min_points: c.min_points,
                    max_points: c.max_points,
                })
            })
            .collect();

        // Given rates must stay inside the bounds of their criterion
        let stranded = WorkRateRepository::out_of_bounds(&mut *tx, contest_id, &updated_rows).await?;
        if !stranded.is_empty() {
            let stranded_names: Vec<&str> = current
                .iter()
                .filter(|c| stranded.contains(&c.criteria_id))
                .map(|c| c.name.as_str())
                .collect();
            return Err(AppError::Conflict(format!(
                "Existing rates fall outside the new bounds of criteria: {}",
                id_list(&stranded_names)
            )));
        }

        let removed_ids: Vec<Uuid> = diff
            .removed
            .iter()
            .filter_map(|c| current_ids.get(c.name.as_str()).copied())
            .collect();
        let dropped_rates = WorkRateRepository::delete_for_criteria(&mut tx, contest_id, &removed_ids).await?;
        CriteriaRepository::delete_for_contest(&mut tx, contest_id, &removed_ids).await?;

        CriteriaRepository::update_for_contest(&mut tx, contest_id, &updated_rows).await?;

        let added_names = names(&diff.added, |c| &c.name);
        let dictionary: HashMap<String, Uuid> = CriteriaRepository::ensure_names(&mut tx, &added_names)
            .await?
            .into_iter()
            .map(|(id, name)| (name, id))
            .collect();
        let added_rows: Vec<CriterionRow> = diff
            .added
            .iter()
            .filter_map(|c| {
                dictionary.get(&c.name).map(|id| CriterionRow {
                    criteria_id: *id,
                    description: c.description.clone(),
                    min_points: c.min_points,
                    max_points: c.max_points,
                })
            })
            .collect();
        CriteriaRepository::insert_for_contest(&mut tx, contest_id, &added_rows).await?;

        tx.commit().await?;

        tracing::info!(
            contest_id = %contest_id,
            added = diff.added.len(),
            removed = diff.removed.len(),
            updated = diff.updated.len(),
            dropped_rates,
            "Contest criteria replaced"
        );

        Ok(ReconcileResponse {
            added: added_names,
            removed: names(&diff.removed, |c| &c.name),
            updated: names(&diff.updated, |c| &c.name),
        })
    }

    /// Replace the nominations of a contest, matching existing ones by name
    pub async fn replace_nominations(
        pool: &PgPool,
        contest_id: Uuid,
        payload: ReplaceNominationsRequest,
    ) -> AppResult<ReconcileResponse> {
        let desired: Vec<NominationDraft> =
            payload.nominations.iter().map(NominationDraft::from).collect();
        validate_nominations(&names(&desired, |n| &n.name))
            .map_err(|problems| AppError::InvalidInput(problems.join("; ")))?;

        let mut tx = pool.begin().await?;
        Self::find(&mut *tx, contest_id).await?;

        let current = NominationRepository::list_for_contest(&mut *tx, contest_id).await?;
        let current_drafts: Vec<NominationDraft> = current.iter().map(NominationDraft::from).collect();
        let diff = diff_by_key(&current_drafts, &desired, |n| n.name.clone());

        let removed_ids: Vec<Uuid> = current
            .iter()
            .filter(|n| diff.removed.iter().any(|r| r.name == n.name))
            .map(|n| n.nomination_id)
            .collect();
        NominationRepository::delete_for_contest(&mut tx, contest_id, &removed_ids).await?;

        let touched: Vec<NominationDraft> = diff.added.iter().chain(&diff.updated).cloned().collect();
        let touched_names = names(&touched, |n| &n.name);
        let dictionary: HashMap<String, Uuid> = NominationRepository::ensure_names(&mut tx, &touched_names)
            .await?
            .into_iter()
            .map(|(id, name)| (name, id))
            .collect();
        let rows: Vec<(Uuid, Option<String>)> = touched
            .iter()
            .filter_map(|n| dictionary.get(&n.name).map(|id| (*id, n.description.clone())))
            .collect();
        NominationRepository::upsert_for_contest(&mut tx, contest_id, &rows).await?;

        tx.commit().await?;

        Ok(ReconcileResponse {
            added: names(&diff.added, |n| &n.name),
            removed: names(&diff.removed, |n| &n.name),
            updated: names(&diff.updated, |n| &n.name),
        })
    }

    /// Dictionary of file constraints a contest can pick from
    pub async fn list_file_constraints(pool: &PgPool) -> AppResult<Vec<FileConstraint>> {
        FileConstraintRepository::list_all(pool).await
    }

    /// Make `file_constraint_ids` the complete set of file constraints of a contest
    pub async fn replace_file_constraints(
        pool: &PgPool,
        contest_id: Uuid,
        payload: ReplaceFileConstraintsRequest,
    ) -> AppResult<FileConstraintsResponse> {
        let requested = dedup(&payload.file_constraint_ids);

        let mut tx = pool.begin().await?;
        Self::find(&mut *tx, contest_id).await?;

        let found = FileConstraintRepository::find_many(&mut *tx, &requested).await?;
        let unknown: Vec<Uuid> = requested
            .iter()
            .filter(|id| !found.iter().any(|c| c.id == **id))
            .copied()
            .collect();
        if !unknown.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Unknown file constraints: {}",
                id_list(&unknown)
            )));
        }

        let current: Vec<Uuid> = FileConstraintRepository::list_for_contest(&mut *tx, contest_id)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        let diff = diff_by_key(&current, &requested, |id| *id);
        FileConstraintRepository::change_for_contest(&mut tx, contest_id, &diff.added, &diff.removed).await?;

        tx.commit().await?;

        tracing::info!(
            contest_id = %contest_id,
            added = diff.added.len(),
            removed = diff.removed.len(),
            "File constraints replaced"
        );

        Ok(FileConstraintsResponse {
            added: diff.added,
            removed: diff.removed,
        })
    }

    /// Replace every stage window of a contest
    pub async fn replace_stage_windows(
        pool: &PgPool,
        stages: &StageResolver,
        contest_id: Uuid,
        payload: ReplaceStagesRequest,
    ) -> AppResult<StagesResponse> {
        let windows: Vec<(StageKind, NaiveDate, NaiveDate)> = payload
            .stages
            .iter()
            .map(|w| (w.stage, w.start_date, w.end_date))
            .collect();
        validate_stage_windows(&windows).map_err(|problems| AppError::InvalidInput(problems.join("; ")))?;

        let mut tx = pool.begin().await?;
        Self::find(&mut *tx, contest_id).await?;
        let stored = StageRepository::replace_windows(&mut tx, contest_id, &windows).await?;
        tx.commit().await?;

        stages.invalidate(contest_id).await;

        tracing::info!(contest_id = %contest_id, windows = stored.len(), "Stage windows replaced");
        Ok(StagesResponse { stages: stored })
    }

    /// Stage of a live contest today
    pub async fn current_stage(
        pool: &PgPool,
        stages: &StageResolver,
        contest_id: Uuid,
        today: NaiveDate,
    ) -> AppResult<CurrentStage> {
        Self::find(pool, contest_id).await?;
        stages.current_stage(contest_id, today).await
    }

    async fn find<'e>(executor: impl sqlx::PgExecutor<'e>, id: Uuid) -> AppResult<Contest> {
        ContestRepository::find_by_id(executor, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Contest {} not found", id)))
    }

    async fn detail(
        pool: &PgPool,
        stages: &StageResolver,
        contest: Contest,
        today: NaiveDate,
    ) -> AppResult<ContestDetailResponse> {
        let (age_categories, nominations, criteria, file_constraints, windows) = futures::try_join!(
            ContestRepository::age_categories(pool, contest.id),
            NominationRepository::list_for_contest(pool, contest.id),
            CriteriaRepository::list_for_contest(pool, contest.id),
            FileConstraintRepository::list_for_contest(pool, contest.id),
            StageRepository::list_windows(pool, contest.id),
        )?;
        let current_stage = stages.current_stage(contest.id, today).await?;

        Ok(ContestDetailResponse {
            contest,
            age_categories,
            nominations,
            criteria,
            file_constraints,
            stages: windows,
            current_stage,
        })
    }
}

/// Split a criteria replacement into added, removed and updated by name
fn plan_criteria(current: &[ContestCriterion], desired: &[CriterionDraft]) -> Diff<CriterionDraft> {
    let current: Vec<CriterionDraft> = current.iter().map(CriterionDraft::from).collect();
    diff_by_key(&current, desired, |c| c.name.clone())
}

/// Remove repeated ids, keeping first occurrences
fn dedup(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}
