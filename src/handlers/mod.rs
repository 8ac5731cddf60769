//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod applications;
pub mod contests;
pub mod health;
pub mod participants;
pub mod winners;
pub mod work_rates;

use axum::{Router, middleware};

use crate::{
    middleware::{auth_middleware, contest_scope_middleware},
    state::AppState,
};

/// Create all API routes
pub fn routes(state: AppState) -> Router<AppState> {
    let authenticated = Router::new()
        .merge(contests::routes())
        .merge(participants::routes())
        .merge(applications::routes())
        .merge(work_rates::routes())
        .merge(winners::routes())
        .route_layer(middleware::from_fn(contest_scope_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(contests::public_routes())
        .merge(authenticated)
}
