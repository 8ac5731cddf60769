//! Application lifecycle handlers

mod handler;
pub mod request;
pub mod response;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Application routes; `/contest/*` is scoped by `X-Contest-Id`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me/applications", get(handler::list_my_applications))
        .route(
            "/contest/applications",
            get(handler::list_applications).post(handler::create_application),
        )
        .route("/contest/applications/approve", post(handler::approve_applications))
        .route(
            "/contest/applications/{id}",
            get(handler::get_application)
                .patch(handler::update_application)
                .delete(handler::delete_application),
        )
        .route("/contest/applications/{id}/reject", post(handler::reject_application))
}
