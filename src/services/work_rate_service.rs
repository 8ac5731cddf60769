//! Jury scoring service

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    db::repositories::{ApplicationRepository, CriteriaRepository, ParticipantRepository, WorkRateRepository},
    error::{AppError, AppResult, id_list},
    handlers::work_rates::{request::RateInput, response::ScoresResponse},
    models::{Application, ApplicationStatus, ApplicationTotal, Completeness, ContestCriterion, ParticipantRole, WorkRate},
    utils::validation::duplicates,
};

/// Work rate service for business logic
pub struct WorkRateService;

impl WorkRateService {
    /// Record first-time scores of a jury member for one application.
    ///
    /// Either every rate is written or none is.
    pub async fn submit_scores(
        pool: &PgPool,
        jury_user: Uuid,
        contest_id: Uuid,
        application_id: Uuid,
        rates: &[RateInput],
    ) -> AppResult<ScoresResponse> {
        let batch: Vec<(Uuid, i32)> = rates.iter().map(|r| (r.criteria_id, r.rate)).collect();

        let mut tx = pool.begin().await?;

        let jury_id = Self::jury_participant(&mut tx, jury_user, contest_id).await?;
        Self::rateable_application(&mut tx, application_id, contest_id, jury_user).await?;

        let criteria = CriteriaRepository::list_for_contest(&mut *tx, contest_id).await?;
        validate_scores(&batch, &criteria).map_err(|problems| AppError::InvalidInput(problems.join("; ")))?;

        let existing = WorkRateRepository::list_for_jury(&mut *tx, application_id, jury_id).await?;
        let already_rated: Vec<Uuid> = batch
            .iter()
            .filter(|(criteria_id, _)| existing.iter().any(|r| r.criteria_id == *criteria_id))
            .map(|(criteria_id, _)| *criteria_id)
            .collect();
        if !already_rated.is_empty() {
            return Err(AppError::Conflict(format!(
                "Criteria already rated for this application: {}",
                id_list(&already_rated)
            )));
        }

        let written = WorkRateRepository::insert_many(&mut tx, application_id, jury_id, &batch).await?;
        let completeness = Self::completeness(&mut tx, &criteria, application_id, jury_id).await?;

        tx.commit().await?;

        tracing::info!(
            application_id = %application_id,
            jury_id = %jury_id,
            count = written.len(),
            complete = completeness.complete,
            "Work rates submitted"
        );

        Ok(ScoresResponse {
            rates: written,
            completeness,
        })
    }

    /// Overwrite scores the jury member already gave
    pub async fn update_scores(
        pool: &PgPool,
        jury_user: Uuid,
        contest_id: Uuid,
        application_id: Uuid,
        rates: &[RateInput],
    ) -> AppResult<ScoresResponse> {
        let batch: Vec<(Uuid, i32)> = rates.iter().map(|r| (r.criteria_id, r.rate)).collect();

        let mut tx = pool.begin().await?;

        let jury_id = Self::jury_participant(&mut tx, jury_user, contest_id).await?;
        Self::rateable_application(&mut tx, application_id, contest_id, jury_user).await?;

        let criteria = CriteriaRepository::list_for_contest(&mut *tx, contest_id).await?;
        validate_scores(&batch, &criteria).map_err(|problems| AppError::InvalidInput(problems.join("; ")))?;

        let existing = WorkRateRepository::list_for_jury(&mut *tx, application_id, jury_id).await?;
        let not_rated: Vec<Uuid> = batch
            .iter()
            .filter(|(criteria_id, _)| !existing.iter().any(|r| r.criteria_id == *criteria_id))
            .map(|(criteria_id, _)| *criteria_id)
            .collect();
        if !not_rated.is_empty() {
            return Err(AppError::NotFound(format!(
                "No existing rates for criteria: {}",
                id_list(&not_rated)
            )));
        }

        let written = WorkRateRepository::update_many(&mut tx, application_id, jury_id, &batch).await?;
        let completeness = Self::completeness(&mut tx, &criteria, application_id, jury_id).await?;

        tx.commit().await?;

        tracing::info!(application_id = %application_id, jury_id = %jury_id, count = written.len(), "Work rates updated");

        Ok(ScoresResponse {
            rates: written,
            completeness,
        })
    }

    /// Every rate the jury member gave in a contest
    pub async fn jury_rates(pool: &PgPool, jury_user: Uuid, contest_id: Uuid) -> AppResult<Vec<WorkRate>> {
        let participant = ParticipantRepository::find(pool, jury_user, contest_id)
            .await?
            .filter(|p| p.role == ParticipantRole::Jury)
            .ok_or_else(|| AppError::Forbidden("Not a jury member of this contest".to_string()))?;

        WorkRateRepository::list_for_jury_in_contest(pool, contest_id, participant.id).await
    }

    /// Sum of rates per accepted application
    pub async fn application_totals(pool: &PgPool, contest_id: Uuid) -> AppResult<Vec<ApplicationTotal>> {
        WorkRateRepository::accepted_totals(pool, contest_id).await
    }

    async fn jury_participant(conn: &mut PgConnection, user_id: Uuid, contest_id: Uuid) -> AppResult<Uuid> {
        ParticipantRepository::find(&mut *conn, user_id, contest_id)
            .await?
            .filter(|p| p.role == ParticipantRole::Jury)
            .map(|p| p.id)
            .ok_or_else(|| AppError::Forbidden("Not a jury member of this contest".to_string()))
    }

    async fn rateable_application(
        conn: &mut PgConnection,
        application_id: Uuid,
        contest_id: Uuid,
        jury_user: Uuid,
    ) -> AppResult<Application> {
        let application = ApplicationRepository::find_for_update(conn, application_id, contest_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application {} not found", application_id)))?;

        ensure_rateable(&application, jury_user)?;
        Ok(application)
    }

    async fn completeness(
        conn: &mut PgConnection,
        criteria: &[ContestCriterion],
        application_id: Uuid,
        jury_id: Uuid,
    ) -> AppResult<Completeness> {
        let configured: Vec<Uuid> = criteria.iter().map(|c| c.criteria_id).collect();
        let rated: Vec<Uuid> = WorkRateRepository::list_for_jury(&mut *conn, application_id, jury_id)
            .await?
            .into_iter()
            .map(|r| r.criteria_id)
            .collect();

        Ok(Completeness::from_rated(&configured, &rated))
    }
}

/// Only accepted applications of other users can be rated
fn ensure_rateable(application: &Application, jury_user: Uuid) -> AppResult<()> {
    if application.user_id == jury_user {
        return Err(AppError::Forbidden("Cannot rate own application".to_string()));
    }
    if application.status != ApplicationStatus::Accepted {
        return Err(AppError::Conflict(format!(
            "Application is {} and cannot be rated",
            application.status
        )));
    }
    Ok(())
}

/// Check a batch of (criteria id, rate) against the contest criteria.
///
/// Every problem of every kind is collected before failing.
fn validate_scores(batch: &[(Uuid, i32)], criteria: &[ContestCriterion]) -> Result<(), Vec<String>> {
    if batch.is_empty() {
        return Err(vec!["At least one rate is required".to_string()]);
    }

    let mut problems = Vec::new();

    let repeated = duplicates(batch.iter().map(|(criteria_id, _)| *criteria_id));
    if !repeated.is_empty() {
        problems.push(format!("Criteria rated more than once: {}", id_list(&repeated)));
    }

    let mut unknown = Vec::new();
    let mut out_of_bounds = Vec::new();
    for (criteria_id, rate) in batch {
        match criteria.iter().find(|c| c.criteria_id == *criteria_id) {
            None => unknown.push(*criteria_id),
            Some(criterion) if !criterion.accepts(*rate) => out_of_bounds.push(format!(
                "{} ({} not in [{}, {}])",
                criteria_id, rate, criterion.min_points, criterion.max_points
            )),
            Some(_) => {}
        }
    }
    if !unknown.is_empty() {
        problems.push(format!("Criteria not configured for this contest: {}", id_list(&unknown)));
    }
    if !out_of_bounds.is_empty() {
        problems.push(format!("Rates out of bounds: {}", out_of_bounds.join(", ")));
    }

    if problems.is_empty() { Ok(()) } else { Err(problems) }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn application(user_id: Uuid, status: ApplicationStatus) -> Application {
        Application {
            id: Uuid::new_v4(),
            name: "Spring".to_string(),
            annotation: "Oil on canvas".to_string(),
            link_to_work: None,
            status,
            rejection_reason: None,
            age_category: "Teen".to_string(),
            nomination_id: Uuid::new_v4(),
            contest_id: Uuid::new_v4(),
            user_id,
            is_deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn criterion(min_points: i32, max_points: i32) -> ContestCriterion {
        ContestCriterion {
            criteria_id: Uuid::new_v4(),
            name: format!("criterion {}", Uuid::new_v4()),
            description: None,
            min_points,
            max_points,
        }
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let c = criterion(1, 10);
        assert!(validate_scores(&[(c.criteria_id, 1)], std::slice::from_ref(&c)).is_ok());
        assert!(validate_scores(&[(c.criteria_id, 10)], std::slice::from_ref(&c)).is_ok());

        let problems = validate_scores(&[(c.criteria_id, 11)], std::slice::from_ref(&c)).unwrap_err();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("11 not in [1, 10]"));
    }

    #[test]
    fn test_empty_batch_rejected() {
        assert!(validate_scores(&[], &[criterion(0, 5)]).is_err());
    }

    #[test]
    fn test_every_problem_reported_together() {
        let a = criterion(0, 5);
        let b = criterion(0, 5);
        let stranger = Uuid::new_v4();

        let problems = validate_scores(
            &[(a.criteria_id, 1), (a.criteria_id, 2), (b.criteria_id, 9), (stranger, 1)],
            &[a.clone(), b.clone()],
        )
        .unwrap_err();

        assert_eq!(problems.len(), 3);
        assert!(problems[0].contains(&a.criteria_id.to_string()));
        assert!(problems[1].contains(&stranger.to_string()));
        assert!(problems[2].contains(&b.criteria_id.to_string()));
    }

    #[test]
    fn test_own_application_cannot_be_rated() {
        let author = Uuid::new_v4();
        let own = application(author, ApplicationStatus::Accepted);
        assert!(matches!(ensure_rateable(&own, author), Err(AppError::Forbidden(_))));
        assert!(ensure_rateable(&own, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_pending_application_cannot_be_rated() {
        let pending = application(Uuid::new_v4(), ApplicationStatus::Pending);
        assert!(matches!(ensure_rateable(&pending, Uuid::new_v4()), Err(AppError::Conflict(_))));
    }
}
