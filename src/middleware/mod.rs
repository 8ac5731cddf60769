//! HTTP middleware

pub mod auth;
pub mod contest_scope;
pub mod logging;

pub use auth::{AuthenticatedUser, auth_middleware};
pub use contest_scope::{ContestScope, contest_scope_middleware};
pub use logging::logging_middleware;
