//! Participant handler implementations

use axum::{
    Json,
    extract::{Query, State},
};
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::{AuthenticatedUser, ContestScope},
    models::{Participant, ParticipantRole},
    services::{AccessGuard, ParticipantService},
    state::AppState,
    utils::today,
};

use super::{
    request::{ChangeRoleRequest, ListParticipantsQuery, SetRosterRequest},
    response::{ParticipantsResponse, RosterResponse},
};

async fn set_roster(
    state: &AppState,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    role: ParticipantRole,
    payload: SetRosterRequest,
) -> AppResult<RosterResponse> {
    payload.validate()?;

    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::role(ParticipantRole::Owner).check(&ctx).await?;

    ParticipantService::set_roster(state.db(), state.users(), scope.require()?, role, &payload.user_ids).await
}

/// Replace the jury of the scoped contest
pub async fn set_jury(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    Json(payload): Json<SetRosterRequest>,
) -> AppResult<Json<RosterResponse>> {
    let response = set_roster(&state, auth_user, scope, ParticipantRole::Jury, payload).await?;
    Ok(Json(response))
}

/// Replace the organizing committee of the scoped contest
pub async fn set_org_committee(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    Json(payload): Json<SetRosterRequest>,
) -> AppResult<Json<RosterResponse>> {
    let response = set_roster(&state, auth_user, scope, ParticipantRole::OrgCommittee, payload).await?;
    Ok(Json(response))
}

/// Move a participant to another role
pub async fn change_role(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    Json(payload): Json<ChangeRoleRequest>,
) -> AppResult<Json<Participant>> {
    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::role(ParticipantRole::Owner).check(&ctx).await?;

    let participant =
        ParticipantService::change_role(state.db(), scope.require()?, payload.user_id, payload.role).await?;
    Ok(Json(participant))
}

/// Participants of the scoped contest
pub async fn list_participants(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    scope: ContestScope,
    Query(query): Query<ListParticipantsQuery>,
) -> AppResult<Json<ParticipantsResponse>> {
    let ctx = state.access_context(auth_user.id, scope, today());
    AccessGuard::any_role(&[ParticipantRole::Owner, ParticipantRole::OrgCommittee])
        .check(&ctx)
        .await?;

    let participants = ParticipantService::list(state.db(), scope.require()?, query.role).await?;
    Ok(Json(ParticipantsResponse { participants }))
}
