//! Winner ranking handlers

mod handler;
pub mod response;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Winner routes, scoped by `X-Contest-Id`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/contest/winners", get(handler::list_winners))
        .route("/contest/winners/recompute", post(handler::recompute_winners))
}
