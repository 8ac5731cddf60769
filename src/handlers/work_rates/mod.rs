//! Jury scoring handlers

mod handler;
pub mod request;
pub mod response;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Scoring routes, scoped by `X-Contest-Id`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/contest/applications/{id}/rates",
            post(handler::submit_scores).put(handler::update_scores),
        )
        .route("/contest/rates/mine", get(handler::my_rates))
        .route("/contest/totals", get(handler::application_totals))
}
