//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    cache::StageCache,
    config::Config,
    middleware::ContestScope,
    rules::{AccessContext, AccessLookup},
    services::{PgAccessLookup, PgStageWindows, PgUserDirectory, StageResolver, UserDirectory},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Database connection pool
    db: PgPool,

    /// Cached contest stage lookups
    stages: StageResolver,

    /// Participant, block and stage lookups for access rules
    access: Arc<dyn AccessLookup>,

    /// Account data owned by the user service
    users: Arc<dyn UserDirectory>,

    /// Application configuration
    config: Config,
}

impl AppState {
    /// Wire the Postgres-backed ports around `db` and the given stage cache
    pub fn new(db: PgPool, cache: Arc<dyn StageCache>, config: Config) -> Self {
        let stages = StageResolver::new(Arc::new(PgStageWindows::new(db.clone())), cache);
        let access = Arc::new(PgAccessLookup::new(db.clone(), stages.clone()));
        let users = Arc::new(PgUserDirectory::new(db.clone()));

        Self {
            inner: Arc::new(AppStateInner {
                db,
                stages,
                access,
                users,
                config,
            }),
        }
    }

    /// Get a reference to the database pool
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub fn stages(&self) -> &StageResolver {
        &self.inner.stages
    }

    pub fn users(&self) -> &dyn UserDirectory {
        self.inner.users.as_ref()
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Access context of `user_id` acting on the scoped contest today
    pub fn access_context(&self, user_id: Uuid, scope: ContestScope, today: NaiveDate) -> AccessContext {
        AccessContext::new(user_id, today, self.inner.access.clone()).with_contest(scope.0)
    }
}
