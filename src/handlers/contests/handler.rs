//! Contest handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    middleware::{AuthenticatedUser, ContestScope},
    models::{Contest, CurrentStage, FileConstraint, ParticipantRole},
    services::{AccessGuard, ContestService},
    state::AppState,
    utils::today,
};

use super::{
    request::{
        CreateContestRequest, ListContestsQuery, ReplaceCriteriaRequest, ReplaceFileConstraintsRequest,
        ReplaceNominationsRequest, ReplaceStagesRequest, UpdateContestRequest,
    },
    response::{
        ContestDetailResponse, ContestsListResponse, FileConstraintsResponse, ReconcileResponse,
        StagesResponse,
    },
};

/// Published contest catalogue
pub async fn list_contests(
    State(state): State<AppState>,
    Query(query): Query<ListContestsQuery>,
) -> AppResult<Json<ContestsListResponse>> {
    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(20);

    let response = ContestService::list_published(state.db(), page, per_page).await?;
    Ok(Json(response))
}

/// Public view of a published contest
pub async fn get_public_contest(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ContestDetailResponse>> {
    let detail = ContestService::get_contest(state.db(), state.stages(), id, today()).await?;
    if !detail.contest.is_visible() {
        return Err(AppError::NotFound(format!("Contest {} not found", id)));
    }

    Ok(Json(detail))
}

/// Stage of a contest today
pub async fn get_current_stage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CurrentStage>> {
    let stage = ContestService::current_stage(state.db(), state.stages(), id, today()).await?;
    Ok(Json(stage))
}

/// Create a contest owned by the caller
pub async fn create_contest(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateContestRequest>,
) -> AppResult<(StatusCode, Json<ContestDetailResponse>)> {
    payload.validate()?;

    let today = today();
    let ctx = state.access_context(auth_user.id, ContestScope::default(), today);
    AccessGuard::authenticated().check(&ctx).await?;

    let contest = ContestService::create_contest(state.db(), state.stages(), auth_user.id, payload, today).await?;
    Ok((StatusCode::CREATED, Json(contest)))
}

/// Contests owned by the caller
pub async fn list_owned(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<Vec<Contest>>> {
    let contests = ContestService::list_for_role(state.db(), auth_user.id, ParticipantRole::Owner).await?;
    Ok(Json(contests))
}

/// Contests the caller judges
pub async fn list_judged(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<Vec<Contest>>> {
    let contests = ContestService::list_for_role(state.db(), auth_user.id, ParticipantRole::Jury).await?;
    Ok(Json(contests))
}

/// Staff view of the scoped contest, drafts included
pub async fn get_contest(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
) -> AppResult<Json<ContestDetailResponse>> {
    let today = today();
    let ctx = state.access_context(auth_user.id, scope, today);
    AccessGuard::any_role(&[ParticipantRole::Owner, ParticipantRole::OrgCommittee, ParticipantRole::Jury])
        .check(&ctx)
        .await?;

    let detail = ContestService::get_contest(state.db(), state.stages(), scope.require()?, today).await?;
    Ok(Json(detail))
}

/// Patch the scoped contest
pub async fn update_contest(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    Json(payload): Json<UpdateContestRequest>,
) -> AppResult<Json<ContestDetailResponse>> {
    payload.validate()?;

    let today = today();
    let ctx = state.access_context(auth_user.id, scope, today);
    AccessGuard::role(ParticipantRole::Owner).check(&ctx).await?;

    let detail =
        ContestService::update_contest(state.db(), state.stages(), scope.require()?, payload, today).await?;
    Ok(Json(detail))
}

/// Show the scoped contest in the catalogue
pub async fn publish_contest(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
) -> AppResult<Json<Contest>> {
    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::role(ParticipantRole::Owner).check(&ctx).await?;

    let contest = ContestService::set_published(state.db(), scope.require()?, true).await?;
    Ok(Json(contest))
}

/// Hide the scoped contest from the catalogue
pub async fn unpublish_contest(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
) -> AppResult<Json<Contest>> {
    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::role(ParticipantRole::Owner).check(&ctx).await?;

    let contest = ContestService::set_published(state.db(), scope.require()?, false).await?;
    Ok(Json(contest))
}

/// Soft delete the scoped contest
pub async fn delete_contest(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
) -> AppResult<StatusCode> {
    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::role(ParticipantRole::Owner).check(&ctx).await?;

    ContestService::delete_contest(state.db(), scope.require()?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace the criteria of the scoped contest
pub async fn replace_criteria(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    Json(payload): Json<ReplaceCriteriaRequest>,
) -> AppResult<Json<ReconcileResponse>> {
    payload.validate()?;

    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::role(ParticipantRole::Owner).check(&ctx).await?;

    let response = ContestService::replace_criteria(state.db(), scope.require()?, payload).await?;
    Ok(Json(response))
}

/// Replace the nominations of the scoped contest
pub async fn replace_nominations(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    Json(payload): Json<ReplaceNominationsRequest>,
) -> AppResult<Json<ReconcileResponse>> {
    payload.validate()?;

    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::role(ParticipantRole::Owner).check(&ctx).await?;

    let response = ContestService::replace_nominations(state.db(), scope.require()?, payload).await?;
    Ok(Json(response))
}

/// File constraints a contest can require
pub async fn list_file_constraints(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<Vec<FileConstraint>>> {
    let ctx = state.access_context(auth_user.id, ContestScope::default(), today());
    AccessGuard::authenticated().check(&ctx).await?;

    let constraints = ContestService::list_file_constraints(state.db()).await?;
    Ok(Json(constraints))
}

/// Replace the file constraints of the scoped contest
pub async fn replace_file_constraints(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    Json(payload): Json<ReplaceFileConstraintsRequest>,
) -> AppResult<Json<FileConstraintsResponse>> {
    payload.validate()?;

    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::role(ParticipantRole::Owner).check(&ctx).await?;

    let response = ContestService::replace_file_constraints(state.db(), scope.require()?, payload).await?;
    Ok(Json(response))
}

/// Replace the stage windows of the scoped contest
pub async fn replace_stages(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    Json(payload): Json<ReplaceStagesRequest>,
) -> AppResult<Json<StagesResponse>> {
    payload.validate()?;

    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::role(ParticipantRole::Owner).check(&ctx).await?;

    let response =
        ContestService::replace_stage_windows(state.db(), state.stages(), scope.require()?, payload).await?;
    Ok(Json(response))
}
