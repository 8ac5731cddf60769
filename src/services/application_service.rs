//! Application lifecycle service

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::{
        ApplicationRepository, ContestRepository, NewApplication, NominationRepository,
        ParticipantRepository,
    },
    error::{AppError, AppResult, id_list},
    handlers::applications::request::{CreateApplicationRequest, UpdateApplicationRequest},
    models::{AgeCategory, Application, ApplicationStatus, Participant, ParticipantRole},
    services::user_directory::UserDirectory,
    utils::full_age,
};

/// Application service for business logic
pub struct ApplicationService;

impl ApplicationService {
    /// Submit a pending application on behalf of `user_id`
    pub async fn create_application(
        pool: &PgPool,
        users: &dyn UserDirectory,
        user_id: Uuid,
        contest_id: Uuid,
        payload: CreateApplicationRequest,
        today: NaiveDate,
    ) -> AppResult<Application> {
        let profile = users.get_user(user_id).await?;

        let mut tx = pool.begin().await?;

        let contest = ContestRepository::find_by_id(&mut *tx, contest_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Contest {} not found", contest_id)))?;

        if !NominationRepository::is_configured(&mut *tx, contest_id, payload.nomination_id).await? {
            return Err(AppError::NotFound(format!(
                "Nomination {} is not part of this contest",
                payload.nomination_id
            )));
        }

        // Staff of a contest cannot compete in it
        if let Some(participant) = ParticipantRepository::find(&mut *tx, user_id, contest_id).await? {
            if participant.role.is_staff() {
                return Err(AppError::Forbidden(format!(
                    "Users with role {} cannot apply to this contest",
                    participant.role
                )));
            }
        }

        if !contest.accepts_region(profile.region.as_deref()) {
            return Err(AppError::Forbidden(
                "Contest is not open to applicants from your region".to_string(),
            ));
        }

        if ApplicationRepository::author_has_entry(&mut *tx, user_id, contest_id, payload.nomination_id).await? {
            return Err(AppError::Conflict(
                "You already have an application in this nomination".to_string(),
            ));
        }
        if ApplicationRepository::name_taken(&mut *tx, &payload.name, contest_id, payload.nomination_id, None)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Application named '{}' already exists in this nomination",
                payload.name
            )));
        }

        let categories = ContestRepository::age_categories(&mut *tx, contest_id).await?;
        let age = full_age(profile.birth_date, today);
        let category = match_age_category(&categories, age)?;

        let application = ApplicationRepository::create(
            &mut *tx,
            &NewApplication {
                name: &payload.name,
                annotation: &payload.annotation,
                link_to_work: payload.link_to_work.as_deref(),
                age_category: &category.name,
                nomination_id: payload.nomination_id,
                contest_id,
                user_id,
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            application_id = %application.id,
            contest_id = %contest_id,
            user_id = %user_id,
            age_category = %application.age_category,
            "Application submitted"
        );
        Ok(application)
    }

    /// Accept a batch of applications; authors become contest members
    pub async fn approve(pool: &PgPool, contest_id: Uuid, ids: &[Uuid]) -> AppResult<Vec<Application>> {
        let mut requested: Vec<Uuid> = Vec::with_capacity(ids.len());
        for id in ids {
            if !requested.contains(id) {
                requested.push(*id);
            }
        }

        let mut tx = pool.begin().await?;

        let found = ApplicationRepository::find_many_for_update(&mut tx, contest_id, &requested).await?;
        let problems = approval_problems(&requested, &found);
        if !problems.is_empty() {
            return Err(AppError::InvalidInput(problems.join("; ")));
        }

        let mut authors: Vec<Uuid> = found.iter().map(|a| a.user_id).collect();
        authors.sort();
        authors.dedup();

        let present = ParticipantRepository::find_many(&mut *tx, contest_id, &authors).await?;
        let staff = staff_authors(&present);
        if !staff.is_empty() {
            return Err(AppError::Conflict(format!(
                "Authors already hold a staff role in this contest: {}",
                id_list(&staff)
            )));
        }

        let accepted = ApplicationRepository::accept_many(&mut tx, &requested).await?;

        ParticipantRepository::insert_many(&mut tx, contest_id, &authors, ParticipantRole::Member).await?;

        tx.commit().await?;

        tracing::info!(contest_id = %contest_id, count = accepted.len(), "Applications accepted");
        Ok(accepted)
    }

    /// Reject one application with a reason
    pub async fn reject(pool: &PgPool, contest_id: Uuid, id: Uuid, reason: &str) -> AppResult<Application> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::InvalidInput("Rejection reason is required".to_string()));
        }

        let mut tx = pool.begin().await?;

        let application = ApplicationRepository::find_for_update(&mut tx, id, contest_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application {} not found", id)))?;

        if !application.can_transition_to(ApplicationStatus::Rejected) {
            return Err(AppError::Conflict(format!("Application {} is already rejected", id)));
        }

        let rejected = ApplicationRepository::reject(&mut *tx, id, reason).await?;
        tx.commit().await?;

        tracing::info!(application_id = %id, contest_id = %contest_id, "Application rejected");
        Ok(rejected)
    }

    /// Author edit of name, annotation or link while the application is pending
    pub async fn update_application(
        pool: &PgPool,
        user_id: Uuid,
        contest_id: Uuid,
        id: Uuid,
        payload: UpdateApplicationRequest,
    ) -> AppResult<Application> {
        let mut tx = pool.begin().await?;

        let application = ApplicationRepository::find_for_update(&mut tx, id, contest_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application {} not found", id)))?;

        if application.user_id != user_id {
            return Err(AppError::Forbidden("Only the author can edit an application".to_string()));
        }
        if !application.is_editable() {
            return Err(AppError::Conflict(format!(
                "Application is {} and can no longer be edited",
                application.status
            )));
        }

        if let Some(name) = payload.name.as_deref() {
            if name != application.name
                && ApplicationRepository::name_taken(
                    &mut *tx,
                    name,
                    contest_id,
                    application.nomination_id,
                    Some(id),
                )
                .await?
            {
                return Err(AppError::Conflict(format!(
                    "Application named '{}' already exists in this nomination",
                    name
                )));
            }
        }

        let updated = ApplicationRepository::update_content(
            &mut *tx,
            id,
            payload.name.as_deref(),
            payload.annotation.as_deref(),
            payload.link_to_work.as_deref(),
        )
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Soft delete by the author
    pub async fn delete_application(pool: &PgPool, user_id: Uuid, contest_id: Uuid, id: Uuid) -> AppResult<()> {
        let application = Self::find_in_contest(pool, contest_id, id).await?;

        if application.user_id != user_id {
            return Err(AppError::Forbidden("Only the author can delete an application".to_string()));
        }

        ApplicationRepository::soft_delete(pool, id).await?;

        tracing::info!(application_id = %id, contest_id = %contest_id, "Application deleted");
        Ok(())
    }

    /// One application, visible to its author and to contest staff
    pub async fn get_application(pool: &PgPool, user_id: Uuid, contest_id: Uuid, id: Uuid) -> AppResult<Application> {
        let application = Self::find_in_contest(pool, contest_id, id).await?;
        if application.user_id == user_id {
            return Ok(application);
        }

        let is_staff = ParticipantRepository::find(pool, user_id, contest_id)
            .await?
            .is_some_and(|p| p.role.is_staff());
        if !is_staff {
            return Err(AppError::Forbidden("Application belongs to another user".to_string()));
        }

        Ok(application)
    }

    /// Live applications of a contest with the given status
    pub async fn list_by_status(
        pool: &PgPool,
        contest_id: Uuid,
        status: ApplicationStatus,
    ) -> AppResult<Vec<Application>> {
        ApplicationRepository::list_by_status(pool, contest_id, status).await
    }

    /// The caller's own live applications
    pub async fn list_mine(pool: &PgPool, user_id: Uuid) -> AppResult<Vec<Application>> {
        ApplicationRepository::list_by_user(pool, user_id).await
    }

    async fn find_in_contest(pool: &PgPool, contest_id: Uuid, id: Uuid) -> AppResult<Application> {
        ApplicationRepository::find_by_id(pool, id)
            .await?
            .filter(|a| a.contest_id == contest_id && !a.is_deleted)
            .ok_or_else(|| AppError::NotFound(format!("Application {} not found", id)))
    }
}

/// The single contest age category containing `age`
fn match_age_category(categories: &[AgeCategory], age: i32) -> AppResult<&AgeCategory> {
    let matching: Vec<&AgeCategory> = categories.iter().filter(|c| c.contains(age)).collect();

    match matching.as_slice() {
        [category] => Ok(*category),
        [] => Err(AppError::InvalidInput(format!(
            "Age {} does not fit any age category of this contest",
            age
        ))),
        many => Err(AppError::InvalidInput(format!(
            "Age {} fits several age categories: {}",
            age,
            many.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ")
        ))),
    }
}

/// Every reason a batch approval cannot go ahead
fn approval_problems(requested: &[Uuid], found: &[Application]) -> Vec<String> {
    let missing: Vec<Uuid> = requested
        .iter()
        .filter(|id| !found.iter().any(|a| a.id == **id))
        .copied()
        .collect();
    let accepted: Vec<Uuid> = found
        .iter()
        .filter(|a| !a.can_transition_to(ApplicationStatus::Accepted))
        .map(|a| a.id)
        .collect();

    let mut problems = Vec::new();
    if !missing.is_empty() {
        problems.push(format!("Applications not found in this contest: {}", id_list(&missing)));
    }
    if !accepted.is_empty() {
        problems.push(format!("Applications already accepted: {}", id_list(&accepted)));
    }
    problems
}

/// Authors whose participant row is a staff role
fn staff_authors(present: &[Participant]) -> Vec<Uuid> {
    let mut staff: Vec<Uuid> = present
        .iter()
        .filter(|p| p.role.is_staff())
        .map(|p| p.user_id)
        .collect();
    staff.sort();
    staff
}
