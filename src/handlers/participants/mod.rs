//! Contest roster handlers

mod handler;
pub mod request;
pub mod response;

use axum::{
    Router,
    routing::{get, patch, put},
};

use crate::state::AppState;

/// Participant routes, scoped by `X-Contest-Id`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/contest/participants", get(handler::list_participants))
        .route("/contest/participants/role", patch(handler::change_role))
        .route("/contest/jury", put(handler::set_jury))
        .route("/contest/org-committee", put(handler::set_org_committee))
}
