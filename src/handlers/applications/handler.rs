//! Application handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::{AuthenticatedUser, ContestScope},
    models::{Application, ApplicationStatus, ParticipantRole, StageKind},
    services::{AccessGuard, ApplicationService},
    state::AppState,
    utils::today,
};

use super::{
    request::{
        ApproveApplicationsRequest, CreateApplicationRequest, ListApplicationsQuery,
        RejectApplicationRequest, UpdateApplicationRequest,
    },
    response::{ApplicationsListResponse, ApprovedResponse},
};

/// Submit an application to the scoped contest
pub async fn create_application(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    Json(payload): Json<CreateApplicationRequest>,
) -> AppResult<(StatusCode, Json<Application>)> {
    payload.validate()?;

    let today = today();
    let ctx = state.access_context(auth_user.id, scope, today);
    AccessGuard::applicant(StageKind::Collection).check(&ctx).await?;

    let application = ApplicationService::create_application(
        state.db(),
        state.users(),
        auth_user.id,
        scope.require()?,
        payload,
        today,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(application)))
}

/// Applications of the scoped contest by status (pending when omitted)
pub async fn list_applications(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    Query(query): Query<ListApplicationsQuery>,
) -> AppResult<Json<ApplicationsListResponse>> {
    let status = query.status.unwrap_or(ApplicationStatus::Pending);

    let ctx = state.access_context(auth_user.id, scope, today());
    let guard = match status {
        ApplicationStatus::Pending => AccessGuard::role(ParticipantRole::OrgCommittee),
        ApplicationStatus::Accepted | ApplicationStatus::Rejected => {
            AccessGuard::any_role(&[ParticipantRole::OrgCommittee, ParticipantRole::Jury])
        }
    };
    guard.check(&ctx).await?;

    let applications = ApplicationService::list_by_status(state.db(), scope.require()?, status).await?;
    Ok(Json(ApplicationsListResponse {
        status: Some(status),
        applications,
    }))
}

/// The caller's own applications across contests
pub async fn list_my_applications(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<ApplicationsListResponse>> {
    let applications = ApplicationService::list_mine(state.db(), auth_user.id).await?;
    Ok(Json(ApplicationsListResponse {
        status: None,
        applications,
    }))
}

/// One application of the scoped contest
pub async fn get_application(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Application>> {
    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::authenticated().check(&ctx).await?;

    let application = ApplicationService::get_application(state.db(), auth_user.id, scope.require()?, id).await?;
    Ok(Json(application))
}

/// Author edit of a pending application
pub async fn update_application(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateApplicationRequest>,
) -> AppResult<Json<Application>> {
    payload.validate()?;

    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::applicant(StageKind::Collection).check(&ctx).await?;

    let application =
        ApplicationService::update_application(state.db(), auth_user.id, scope.require()?, id, payload).await?;
    Ok(Json(application))
}

/// Author withdrawal of an application
pub async fn delete_application(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::authenticated().check(&ctx).await?;

    ApplicationService::delete_application(state.db(), auth_user.id, scope.require()?, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Accept a batch of applications
pub async fn approve_applications(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    Json(payload): Json<ApproveApplicationsRequest>,
) -> AppResult<Json<ApprovedResponse>> {
    payload.validate()?;

    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::role_in_stage(ParticipantRole::OrgCommittee, StageKind::Collection)
        .check(&ctx)
        .await?;

    let accepted = ApplicationService::approve(state.db(), scope.require()?, &payload.application_ids).await?;
    Ok(Json(ApprovedResponse { accepted }))
}

/// Reject one application
pub async fn reject_application(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectApplicationRequest>,
) -> AppResult<Json<Application>> {
    payload.validate()?;

    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::role_in_stage(ParticipantRole::OrgCommittee, StageKind::Collection)
        .check(&ctx)
        .await?;

    let application = ApplicationService::reject(state.db(), scope.require()?, id, &payload.reason).await?;
    Ok(Json(application))
}
