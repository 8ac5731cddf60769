//! Work rate handler implementations

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::{AuthenticatedUser, ContestScope},
    models::{ParticipantRole, StageKind},
    services::{AccessGuard, WorkRateService},
    state::AppState,
    utils::today,
};

use super::{
    request::SubmitScoresRequest,
    response::{JuryRatesResponse, ScoresResponse, TotalsResponse},
};

/// First scores of the calling jury member for an application
pub async fn submit_scores(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    Path(application_id): Path<Uuid>,
    Json(payload): Json<SubmitScoresRequest>,
) -> AppResult<(StatusCode, Json<ScoresResponse>)> {
    payload.validate()?;

    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::role_in_stage(ParticipantRole::Jury, StageKind::Evaluation)
        .check(&ctx)
        .await?;

    let response = WorkRateService::submit_scores(
        state.db(),
        auth_user.id,
        scope.require()?,
        application_id,
        &payload.rates,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Overwrite scores the calling jury member already gave
pub async fn update_scores(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    Path(application_id): Path<Uuid>,
    Json(payload): Json<SubmitScoresRequest>,
) -> AppResult<Json<ScoresResponse>> {
    payload.validate()?;

    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::role_in_stage(ParticipantRole::Jury, StageKind::Evaluation)
        .check(&ctx)
        .await?;

    let response = WorkRateService::update_scores(
        state.db(),
        auth_user.id,
        scope.require()?,
        application_id,
        &payload.rates,
    )
    .await?;

    Ok(Json(response))
}

/// Every rate the calling jury member gave in the scoped contest
pub async fn my_rates(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
) -> AppResult<Json<JuryRatesResponse>> {
    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::role(ParticipantRole::Jury).check(&ctx).await?;

    let rates = WorkRateService::jury_rates(state.db(), auth_user.id, scope.require()?).await?;
    Ok(Json(JuryRatesResponse { rates }))
}

/// Score totals of accepted applications
pub async fn application_totals(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
) -> AppResult<Json<TotalsResponse>> {
    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::any_role(&[ParticipantRole::Owner, ParticipantRole::OrgCommittee, ParticipantRole::Jury])
        .check(&ctx)
        .await?;

    let totals = WorkRateService::application_totals(state.db(), scope.require()?).await?;
    Ok(Json(TotalsResponse { totals }))
}
