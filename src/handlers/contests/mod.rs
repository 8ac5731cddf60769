//! Contest management handlers

mod handler;
pub mod request;
pub mod response;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Catalogue routes open to anonymous callers
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/contests", get(handler::list_contests))
        .route("/contests/{id}", get(handler::get_public_contest))
        .route("/contests/{id}/stage", get(handler::get_current_stage))
}

/// Authenticated routes; `/contest/*` acts on the contest named by `X-Contest-Id`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me/contests/owned", get(handler::list_owned))
        .route("/me/contests/judged", get(handler::list_judged))
        .route("/file-constraints", get(handler::list_file_constraints))
        .route(
            "/contest",
            post(handler::create_contest)
                .get(handler::get_contest)
                .patch(handler::update_contest)
                .delete(handler::delete_contest),
        )
        .route("/contest/publish", post(handler::publish_contest))
        .route("/contest/unpublish", post(handler::unpublish_contest))
        // Configuration
        .route("/contest/criteria", put(handler::replace_criteria))
        .route("/contest/nominations", put(handler::replace_nominations))
        .route("/contest/file-constraints", put(handler::replace_file_constraints))
        .route("/contest/stages", put(handler::replace_stages))
}
