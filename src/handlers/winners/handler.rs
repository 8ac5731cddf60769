//! Winner handler implementations

use axum::{Json, extract::State};

use crate::{
    error::AppResult,
    middleware::{AuthenticatedUser, ContestScope},
    models::{ParticipantRole, StageKind},
    services::{AccessGuard, WinnerService},
    state::AppState,
    utils::today,
};

use super::response::{RecomputeResponse, WinnersResponse};

/// Rebuild winner rows from the current scores
pub async fn recompute_winners(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
) -> AppResult<Json<RecomputeResponse>> {
    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::role_in_stage(ParticipantRole::Owner, StageKind::Results)
        .check(&ctx)
        .await?;

    let response = WinnerService::recompute_winners(state.db(), scope.require()?).await?;
    Ok(Json(response))
}

/// Ranked standings, available once results are announced
pub async fn list_winners(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
) -> AppResult<Json<WinnersResponse>> {
    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::stage(StageKind::Results).check(&ctx).await?;

    let winners = WinnerService::list_winners(state.db(), scope.require()?).await?;
    Ok(Json(WinnersResponse { winners }))
}
