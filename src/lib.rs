//! Contest Engine - contest lifecycle and scoring backend
//!
//! Organizers configure contests, members submit applications, jury members
//! score accepted works against per-contest criteria and winners are ranked
//! per nomination and age category.
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Rules**: composable access requirements (role, stage, block status)
//! - **Services**: Business logic
//! - **Repositories**: Database access
//! - **Cache**: stage resolution cache port (Redis or in-process)
//! - **Models**: Domain models

pub mod cache;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod rules;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
