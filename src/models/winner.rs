//! Winner models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Derived ranking row, one per accepted application
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct Winner {
    pub id: Uuid,
    pub contest_id: Uuid,
    pub application_id: Uuid,
    pub sum_rate: i64,
    pub place: i32,
}

/// Ranked winner with the application details needed for display
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct WinnerStanding {
    pub application_id: Uuid,
    pub application_name: String,
    pub user_id: Uuid,
    pub nomination_id: Uuid,
    pub nomination_name: String,
    pub age_category: String,
    pub sum_rate: i64,
    pub place: i32,
}
